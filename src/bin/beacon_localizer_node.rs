use anyhow::{Error, Result};
use aries_core::config::AriesConfig;
use aries_core::perception::scan::LaserScan;
use aries_core::perception::sensors::LatestScan;
use aries_core::perception::PerceptionStack;
use aries_core::AriesCore;
use log::{debug, error, info, warn};
use rclrs::{
    Context, CreateBasicExecutor, Node, RclrsErrorFilter, SpinOptions, QOS_PROFILE_DEFAULT,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use geometry_msgs::msg::PointStamped;
use sensor_msgs::msg::LaserScan as LaserScanMsg;
use std_msgs::msg::Header;

/// Environment variable naming the TOML configuration file
const CONFIG_ENV: &str = "ARIES_CONFIG";

struct BeaconLocalizerNode {
    core: Mutex<AriesCore>,
    node: Arc<Node>,
    config: AriesConfig,
    latest_scan: LatestScan<LaserScanMsg>,
    scan_subscription: Mutex<Option<Arc<rclrs::Subscription<LaserScanMsg>>>>,
    vis_scan_publisher: Arc<rclrs::Publisher<LaserScanMsg>>,
    position_publisher: Arc<rclrs::Publisher<PointStamped>>,
    running: Arc<AtomicBool>,
}

/// Convert a ROS scan into the core's representation
fn scan_from_msg(msg: &LaserScanMsg) -> LaserScan {
    LaserScan {
        angle_min: msg.angle_min as f64,
        angle_max: msg.angle_max as f64,
        angle_increment: msg.angle_increment as f64,
        range_min: msg.range_min as f64,
        range_max: msg.range_max as f64,
        ranges: msg.ranges.iter().map(|&r| r as f64).collect(),
    }
}

impl BeaconLocalizerNode {
    pub fn new(
        executor: &rclrs::Executor,
        name: &str,
        config: AriesConfig,
    ) -> Result<Arc<Self>> {
        let node = executor.create_node(name)?;

        let mut core = AriesCore::new();
        core.register(PerceptionStack::new(config.beacon.clone()));
        core.init()?;
        info!("Core initialized successfully");

        info!(
            "Topics: scan={}, vis_scan={}, position={}",
            config.node.scan_topic, config.node.vis_scan_topic, config.node.position_topic
        );

        let vis_scan_publisher = node
            .create_publisher::<LaserScanMsg>(&config.node.vis_scan_topic, QOS_PROFILE_DEFAULT)?;
        let position_publisher = node
            .create_publisher::<PointStamped>(&config.node.position_topic, QOS_PROFILE_DEFAULT)?;

        let running = Arc::new(AtomicBool::new(true));

        let beacon_node = Arc::new(BeaconLocalizerNode {
            core: Mutex::new(core),
            node,
            config,
            latest_scan: LatestScan::new(),
            scan_subscription: None.into(),
            vis_scan_publisher,
            position_publisher,
            running,
        });

        // Scans only land in the slot; processing happens on the worker thread
        let beacon_node_clone = Arc::clone(&beacon_node);
        let scan_subscription = beacon_node.node.create_subscription::<LaserScanMsg, _>(
            &beacon_node.config.node.scan_topic,
            QOS_PROFILE_DEFAULT,
            move |msg: LaserScanMsg| {
                if beacon_node_clone.latest_scan.publish(msg) {
                    debug!("Unprocessed scan replaced by a newer one");
                }
            },
        )?;

        *beacon_node
            .scan_subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(scan_subscription);

        let beacon_node_clone = Arc::clone(&beacon_node);
        let running_clone = Arc::clone(&beacon_node.running);
        let period = Duration::from_secs_f64(1.0 / beacon_node.config.node.rate_hz);

        thread::spawn(move || {
            while running_clone.load(Ordering::Relaxed) {
                beacon_node_clone.timer_callback();
                thread::sleep(period);
            }
        });

        Ok(beacon_node)
    }

    fn timer_callback(&self) {
        let Some(msg) = self.latest_scan.take() else {
            return;
        };
        let scan = scan_from_msg(&msg);
        let header = msg.header.clone();

        if self.config.node.publish_vis_scan {
            let echo = scan.diagnostic_echo(self.config.beacon.max_trusted_range);
            let mut vis_msg = msg;
            vis_msg.range_max = echo.range_max as f32;
            if let Err(e) = self.vis_scan_publisher.publish(&vis_msg) {
                error!("Failed to publish vis scan: {}", e);
            }
        }

        let mut core = self.core.lock().unwrap_or_else(|e| e.into_inner());
        let Some(perception) = core.perception_stack_mut() else {
            error!("Perception stack not registered");
            return;
        };

        match perception.process_scan(&scan) {
            Ok(outcome) => match outcome.pose {
                Some(pose) => self.publish_position(&header, pose.x, pose.y),
                None => debug!("Beacon not found in scan"),
            },
            Err(e) => warn!("Scan skipped: {}", e),
        }
    }

    /// Publish a fix stamped with the scan it came from
    fn publish_position(&self, scan_header: &Header, x: f64, y: f64) {
        let mut msg = PointStamped::default();
        msg.header.stamp = scan_header.stamp.clone();
        msg.header.frame_id = self.config.node.frame_id.clone();
        msg.point.x = x;
        msg.point.y = y;
        msg.point.z = 0.0;

        if let Err(e) = self.position_publisher.publish(&msg) {
            error!("Failed to publish position: {}", e);
        } else {
            info!("Robot position: ({:.3}, {:.3})", x, y);
        }
    }
}

impl Drop for BeaconLocalizerNode {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Initializing Beacon Localizer Node...");

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            AriesConfig::load(&path)?
        }
        Err(_) => {
            info!("{} not set, using default configuration", CONFIG_ENV);
            AriesConfig::default()
        }
    };

    let mut executor = Context::default_from_env()?.create_basic_executor();

    let _beacon_localizer_node =
        BeaconLocalizerNode::new(&executor, "beacon_localizer", config)?;

    info!("Beacon Localizer Node initialized. Starting to spin...");

    executor
        .spin(SpinOptions::default())
        .first_error()
        .map_err(|err| err.into())
}
