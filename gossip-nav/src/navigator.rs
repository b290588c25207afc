//! Per-agent navigator
//!
//! One [`Navigator`] per agent, owning its distance table and (for seekers)
//! its waypoint state. A tick runs to completion before the next begins:
//!
//! 1. Fold wheel odometry into the table and waypoint
//! 2. Drain receptions through the gossip processor
//! 3. Broadcast the single outbound decision, if any
//! 4. Steer (seekers follow the waypoint controller)

use crate::config::NavConfig;
use crate::core::driver::{LocomotionActuator, OdometrySensor};
use crate::core::types::{OdometryReading, Reception, Role, WheelVelocities};
use crate::error::Result;
use crate::gossip::{GossipProcessor, GossipStats, Outbound};
use crate::navigation::{
    BestNavState, ControllerStep, LegSampler, NavState, NavigationController, SteeringCommand,
};
use crate::odometry::{MotionDelta, OdometryIntegrator};
use crate::table::DistanceTable;
use crate::transport::BroadcastTransport;

/// Everything that happened in one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick counter, starting at 1
    pub tick: u64,
    pub motion: MotionDelta,
    pub outbound: Outbound,
    pub stats: GossipStats,
    /// Seeker controller step, `None` for other roles
    pub controller: Option<ControllerStep>,
    pub steering: SteeringCommand,
    pub wheels: WheelVelocities,
}

/// Navigation protocol instance for one agent
#[derive(Debug)]
pub struct Navigator {
    config: NavConfig,
    table: DistanceTable,
    best: Option<BestNavState>,
    odometry: OdometryIntegrator,
    gossip: GossipProcessor,
    controller: Option<NavigationController>,
    ticks: u64,
}

impl Navigator {
    /// Create a navigator from a validated configuration
    ///
    /// The target seeds its own row; seekers get waypoint state and a
    /// controller.
    pub fn new(config: NavConfig) -> Result<Self> {
        config.validate()?;

        let role = config.agent.role;
        let table = if role.is_target() {
            DistanceTable::seeded(config.agent.self_id)
        } else {
            DistanceTable::new()
        };

        let (best, controller) = if role.is_seeker() {
            let nav = &config.navigation;
            let sampler = LegSampler::new(nav.random_seed, nav.exploration_mean_distance)?;
            let controller = NavigationController::new(
                nav.navigation_type,
                nav.arrival_radius,
                config.steering.go_straight_angle(),
                sampler,
            );
            (Some(BestNavState::new()), Some(controller))
        } else {
            (None, None)
        };

        log::info!(
            "Navigator: {:?} (self_id={}, nav_target_id={}, comm_range={:.1})",
            role,
            config.agent.self_id,
            config.agent.nav_target_id,
            config.radio.comm_range
        );

        Ok(Self {
            gossip: GossipProcessor::from_config(&config),
            config,
            table,
            best,
            odometry: OdometryIntegrator::new(),
            controller,
            ticks: 0,
        })
    }

    pub fn role(&self) -> Role {
        self.config.agent.role
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// Seeker waypoint state
    pub fn best_nav(&self) -> Option<&BestNavState> {
        self.best.as_ref()
    }

    /// Seeker controller state
    pub fn nav_state(&self) -> Option<NavState> {
        self.controller.as_ref().map(NavigationController::state)
    }

    pub fn is_terminated(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(NavigationController::is_terminated)
    }

    pub fn odometry(&self) -> &OdometryIntegrator {
        &self.odometry
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick on already-gathered inputs
    pub fn step(&mut self, reading: &OdometryReading, receptions: &[Reception]) -> TickReport {
        self.ticks += 1;

        let motion = self.odometry.integrate(reading);
        self.odometry
            .apply(&motion, &mut self.table, self.best.as_mut());

        let outcome = self
            .gossip
            .process(receptions, &mut self.table, self.best.as_mut());

        let controller = match (self.controller.as_mut(), self.best.as_mut()) {
            (Some(controller), Some(best)) => Some(controller.step(best)),
            _ => None,
        };

        let steering = match (self.role(), controller) {
            (_, Some(step)) => step.steering,
            (Role::Wanderer, None) => SteeringCommand::Straight,
            _ => SteeringCommand::Stop,
        };
        let wheels = steering.wheel_velocities(self.config.steering.wheel_velocity);

        TickReport {
            tick: self.ticks,
            motion,
            outbound: outcome.outbound,
            stats: outcome.stats,
            controller,
            steering,
            wheels,
        }
    }

    /// Run one tick against the robot's drivers
    pub fn tick<S, T, A>(&mut self, sensor: &mut S, radio: &mut T, wheels: &mut A) -> Result<TickReport>
    where
        S: OdometrySensor + ?Sized,
        T: BroadcastTransport + ?Sized,
        A: LocomotionActuator + ?Sized,
    {
        let reading = sensor.read()?;
        let receptions = radio.receive()?;

        let report = self.step(&reading, &receptions);

        if let Some(payload) = report.outbound.payload() {
            radio.send(&payload)?;
        }
        wheels.apply(report.wheels)?;

        Ok(report)
    }
}
