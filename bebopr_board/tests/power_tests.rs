//! I/O power sequencing tests.
//!
//! Uses a recording `GpioPort` for exact write order and a temporary
//! directory laid out like `/sys/class/gpio` for the sysfs backend.

use bebopr_board::{BoardCore, Direction, GpioError, GpioOp, GpioPort, PowerSequencer, SysfsGpio};
use bebopr_common::board::variant::{HardwareVariant, PowerLine};
use bebopr_common::config::BoardConfig;
use bebopr_common::kernel::{KernelGeneration, KernelInfo};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingGpio {
    ops: Vec<(GpioOp, u32)>,
}

impl GpioPort for RecordingGpio {
    fn export(&mut self, pin: u32) -> Result<(), GpioError> {
        self.ops.push((GpioOp::Export, pin));
        Ok(())
    }

    fn unexport(&mut self, pin: u32) -> Result<(), GpioError> {
        self.ops.push((GpioOp::Unexport, pin));
        Ok(())
    }

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<(), GpioError> {
        self.ops.push((GpioOp::Direction(direction), pin));
        Ok(())
    }

    fn set_value(&mut self, pin: u32, high: bool) -> Result<(), GpioError> {
        self.ops.push((GpioOp::Value(high), pin));
        Ok(())
    }
}

fn core(hardware: HardwareVariant, release: &str) -> BoardCore {
    let mut config = BoardConfig::default();
    config.board.hardware = hardware;
    BoardCore::with_kernel(config, KernelInfo::from_release(Some(release.to_string()))).unwrap()
}

/// Final level of each pin after replaying `ops`.
fn final_level(ops: &[(GpioOp, u32)], pin: u32) -> Option<bool> {
    ops.iter().rev().find_map(|(op, p)| match op {
        GpioOp::Value(v) if *p == pin => Some(*v),
        _ => None,
    })
}

#[test]
fn test_stock_bone_legacy_sequence() {
    let core = core(HardwareVariant::Bone, "3.2.34");
    let mut gpio = RecordingGpio::default();

    let on = core.post_init(&mut gpio);
    assert!(on.is_clean());
    assert_eq!(
        gpio.ops,
        vec![
            (GpioOp::Export, 38),
            (GpioOp::Direction(Direction::Out), 38),
            (GpioOp::Export, 34),
            (GpioOp::Direction(Direction::Out), 34),
            (GpioOp::Value(true), 38),
            (GpioOp::Value(false), 34),
        ]
    );

    gpio.ops.clear();
    let off = core.exit(&mut gpio);
    assert_eq!(off.attempted, 6);
    assert_eq!(
        gpio.ops,
        vec![
            (GpioOp::Value(false), 38),
            (GpioOp::Value(true), 34),
            (GpioOp::Direction(Direction::In), 38),
            (GpioOp::Unexport, 38),
            (GpioOp::Direction(Direction::In), 34),
            (GpioOp::Unexport, 34),
        ]
    );
}

#[test]
fn test_enable_patch_legacy_sequence() {
    let core = core(HardwareVariant::BoneEnablePatch, "3.2.34");
    let mut gpio = RecordingGpio::default();

    assert!(core.post_init(&mut gpio).is_clean());
    assert_eq!(
        gpio.ops,
        vec![
            (GpioOp::Export, 66),
            (GpioOp::Direction(Direction::Out), 66),
            (GpioOp::Value(false), 66),
        ]
    );

    gpio.ops.clear();
    assert!(core.exit(&mut gpio).is_clean());
    assert_eq!(
        gpio.ops,
        vec![
            (GpioOp::Value(true), 66),
            (GpioOp::Direction(Direction::In), 66),
            (GpioOp::Unexport, 66),
        ]
    );
}

#[test]
fn test_single_line_variants_use_gpio66() {
    for hw in [
        HardwareVariant::BoneEnablePatch,
        HardwareVariant::BoneBridge,
        HardwareVariant::BoneBlack,
    ] {
        let core = core(hw, "3.8.13-bone30");
        let mut gpio = RecordingGpio::default();

        core.post_init(&mut gpio);
        assert_eq!(gpio.ops, vec![(GpioOp::Value(false), 66)], "{hw}");

        gpio.ops.clear();
        core.exit(&mut gpio);
        assert_eq!(gpio.ops, vec![(GpioOp::Value(true), 66)], "{hw}");
    }
}

#[test]
fn test_power_off_mirrors_power_on() {
    for (hw, release) in [
        (HardwareVariant::Bone, "3.2.34"),
        (HardwareVariant::Bone, "3.8.13"),
        (HardwareVariant::BoneEnablePatch, "3.2.34"),
        (HardwareVariant::BoneEnablePatch, "4.14.108"),
    ] {
        let core = core(hw, release);
        let mut on = RecordingGpio::default();
        let mut off = RecordingGpio::default();
        core.post_init(&mut on);
        core.exit(&mut off);

        for line in hw.power_lines() {
            let asserted = final_level(&on.ops, line.gpio).unwrap();
            let released = final_level(&off.ops, line.gpio).unwrap();
            assert_eq!(asserted, line.on_level());
            assert_eq!(released, !asserted, "{hw} gpio{}", line.gpio);
        }
    }
}

#[test]
fn test_other_kernel_skips_export() {
    let mut gpio = RecordingGpio::default();
    let report = PowerSequencer::new(
        vec![PowerLine::active_low(66)],
        KernelGeneration::Other,
        &mut gpio,
    )
    .power_on();

    assert_eq!(report.attempted, 1);
    assert_eq!(gpio.ops, vec![(GpioOp::Value(false), 66)]);
}

/// Build a fake sysfs GPIO tree with the given pins already present.
fn sysfs_tree(pins: &[u32]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("export"), "").unwrap();
    fs::write(dir.path().join("unexport"), "").unwrap();
    for pin in pins {
        let pin_dir = dir.path().join(format!("gpio{pin}"));
        fs::create_dir(&pin_dir).unwrap();
        fs::write(pin_dir.join("direction"), "in").unwrap();
        fs::write(pin_dir.join("value"), "0").unwrap();
    }
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_sysfs_writes_land_in_expected_files() {
    let tree = sysfs_tree(&[38, 34]);
    let mut config = BoardConfig::default();
    config.board.gpio_root = tree.path().to_path_buf();
    let core = BoardCore::with_kernel(config, KernelInfo::from_release(Some("3.2.34".into())))
        .unwrap();
    let mut gpio = core.sysfs_gpio();

    let report = core.post_init(&mut gpio);
    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(read(&tree.path().join("export")), "34");
    assert_eq!(read(&tree.path().join("gpio38/direction")), "out");
    assert_eq!(read(&tree.path().join("gpio38/value")), "1");
    assert_eq!(read(&tree.path().join("gpio34/direction")), "out");
    assert_eq!(read(&tree.path().join("gpio34/value")), "0");

    let report = core.exit(&mut gpio);
    assert!(report.is_clean());
    assert_eq!(read(&tree.path().join("gpio38/value")), "0");
    assert_eq!(read(&tree.path().join("gpio34/value")), "1");
    assert_eq!(read(&tree.path().join("gpio34/direction")), "in");
    assert_eq!(read(&tree.path().join("unexport")), "34");
}

#[test]
fn test_sysfs_export_writes_pin_number() {
    let tree = sysfs_tree(&[]);
    let mut gpio = SysfsGpio::new(tree.path());

    gpio.export(38).unwrap();
    assert_eq!(read(&tree.path().join("export")), "38");
    gpio.export(66).unwrap();
    assert_eq!(read(&tree.path().join("export")), "66");
    gpio.unexport(66).unwrap();
    assert_eq!(read(&tree.path().join("unexport")), "66");
}

#[test]
fn test_sysfs_missing_pin_is_logged_not_fatal() {
    // gpio38 was never created, so its writes fail; gpio34 still switches.
    let tree = sysfs_tree(&[34]);
    let mut gpio = SysfsGpio::new(tree.path());

    let report = PowerSequencer::for_hardware(
        HardwareVariant::Bone,
        KernelGeneration::DeviceTree38,
        &mut gpio,
    )
    .power_on();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].pin, 38);
    assert_eq!(report.failures[0].op, GpioOp::Value(true));
    assert_eq!(read(&tree.path().join("gpio34/value")), "0");
}
