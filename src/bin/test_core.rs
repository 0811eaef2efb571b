use anyhow::{anyhow, Result};
use aries_core::config::{BeaconConfig, PivotConfig};
use aries_core::control::controllers::SimulatedServo;
use aries_core::control::ControlStack;
use aries_core::perception::scan::LaserScan;
use aries_core::perception::PerceptionStack;
use aries_core::AriesCore;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// Synthetic 360-sample scan with two posts in front of a 1 m background
fn synthetic_beacon_scan() -> LaserScan {
    let mut ranges = vec![1.0; 360];
    for range in &mut ranges[100..=105] {
        *range = 0.5;
    }
    for range in &mut ranges[170..=176] {
        *range = 0.55;
    }
    // far wall, clamped away
    for range in &mut ranges[300..=340] {
        *range = 3.5;
    }
    LaserScan::new(0.0, TAU / 360.0, 12.0, ranges)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("Initializing Aries Core...");

    let mut beacon_config = BeaconConfig::default();

    // Same override path the node uses for parameters
    let mut params = HashMap::new();
    params.insert("separation_tolerance".to_string(), 0.025);
    params.insert("max_trusted_range".to_string(), 1.25);
    beacon_config.configure(&params)?;

    let mut core = AriesCore::new();
    core.register(PerceptionStack::new(beacon_config));
    core.register(ControlStack::new(
        SimulatedServo::default(),
        &PivotConfig::default(),
    )?);

    core.init()?;
    println!("Core initialized successfully!");

    if let Some(control) = core.control_stack_mut() {
        control.set_pivot_angle(0.0)?;
        control.update()?;
        println!("Pivot angle: {:.3} rad", control.pivot_angle()?);
    }

    let scan = synthetic_beacon_scan();
    let perception = core
        .perception_stack_mut()
        .ok_or_else(|| anyhow!("perception stack not registered"))?;
    let outcome = perception.process_scan(&scan)?;

    println!("Found {} candidate object(s)", outcome.objects.len());
    for object in &outcome.objects {
        println!(
            "  centroid {:>3}  bearing {:>7.2}°  range {:.3} m",
            object.centroid_index,
            object.bearing.to_degrees(),
            object.range
        );
    }

    match (outcome.beacon, outcome.pose) {
        (Some(beacon), Some(pose)) => {
            println!(
                "Beacon: separation {:.4} m (err {:.4} m)",
                beacon.measured_separation, beacon.separation_error
            );
            println!("Robot position: ({:.4}, {:.4}) m", pose.x, pose.y);
        }
        _ => println!("Beacon not found"),
    }

    core.shutdown()?;
    println!("Core shutdown successfully!");
    Ok(())
}
