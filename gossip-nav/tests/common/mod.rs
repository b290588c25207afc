//! Test utilities for multi-agent gossip scenarios.
//!
//! Agents sit on a [`MockMedium`] with caller-defined links; odometry is
//! scripted per agent and wheel commands are recorded.

#![allow(dead_code)]

use gossip_nav::core::driver::{LocomotionActuator, OdometrySensor};
use gossip_nav::transport::{MockMedium, MockRadio};
use gossip_nav::{NavConfig, Navigator, OdometryReading, Result, Role, TickReport, WheelVelocities};
use std::collections::VecDeque;

/// Wheel axis used by scripted odometry
pub const WHEEL_AXIS: f32 = 14.0;

/// Install a test logger once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic config for a role
pub fn config(role: Role) -> NavConfig {
    let mut config = NavConfig::for_role(role);
    config.navigation.random_seed = 42;
    config
}

/// Odometry that replays queued readings, then reports no motion
#[derive(Default)]
pub struct ScriptedOdometry {
    readings: VecDeque<OdometryReading>,
}

impl ScriptedOdometry {
    pub fn push(&mut self, reading: OdometryReading) {
        self.readings.push_back(reading);
    }

    /// Queue a straight move of `distance`
    pub fn forward(&mut self, distance: f32) {
        self.push(OdometryReading::new(distance, distance, WHEEL_AXIS));
    }

    /// Queue an in-place rotation of `radians` (positive = CCW)
    pub fn rotate(&mut self, radians: f32) {
        let arc = radians * WHEEL_AXIS / 2.0;
        self.push(OdometryReading::new(-arc, arc, WHEEL_AXIS));
    }
}

impl OdometrySensor for ScriptedOdometry {
    fn read(&mut self) -> Result<OdometryReading> {
        Ok(self.readings.pop_front().unwrap_or(OdometryReading {
            wheel_axis_length: WHEEL_AXIS,
            ..Default::default()
        }))
    }
}

/// Actuator that records every command
#[derive(Default)]
pub struct RecordingWheels {
    pub commands: Vec<WheelVelocities>,
}

impl LocomotionActuator for RecordingWheels {
    fn set_wheel_velocities(&mut self, left: f32, right: f32) -> Result<()> {
        self.commands.push(WheelVelocities::new(left, right));
        Ok(())
    }
}

/// One simulated agent
pub struct Agent {
    pub navigator: Navigator,
    pub radio: MockRadio,
    pub odometry: ScriptedOdometry,
    pub wheels: RecordingWheels,
    pub reports: Vec<TickReport>,
}

impl Agent {
    pub fn last_report(&self) -> &TickReport {
        self.reports.last().expect("agent has not ticked yet")
    }
}

/// Agents ticked in index order each round
pub struct Swarm {
    pub medium: MockMedium,
    pub agents: Vec<Agent>,
}

impl Swarm {
    pub fn new() -> Self {
        init_logging();
        Self {
            medium: MockMedium::new(),
            agents: Vec::new(),
        }
    }

    /// Add an agent, returning its index on the medium
    pub fn add(&mut self, config: NavConfig) -> usize {
        let id = self.agents.len();
        self.agents.push(Agent {
            navigator: Navigator::new(config).expect("valid config"),
            radio: self.medium.radio(id),
            odometry: ScriptedOdometry::default(),
            wheels: RecordingWheels::default(),
            reports: Vec::new(),
        });
        id
    }

    /// Tick every agent once
    pub fn round(&mut self) {
        for agent in &mut self.agents {
            let report = agent
                .navigator
                .tick(&mut agent.odometry, &mut agent.radio, &mut agent.wheels)
                .expect("tick");
            agent.reports.push(report);
        }
    }

    pub fn run(&mut self, rounds: usize) {
        for _ in 0..rounds {
            self.round();
        }
    }

    pub fn agent(&self, id: usize) -> &Agent {
        &self.agents[id]
    }

    pub fn agent_mut(&mut self, id: usize) -> &mut Agent {
        &mut self.agents[id]
    }
}
