//! Simulation constants and tuning parameters.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Default seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Tolerance when comparing accumulated timers against their thresholds.
pub const TIMER_EPSILON: f64 = 1e-9;

// --- Movement ---

/// Distance below which an agent has reached its waypoint.
pub const ARRIVAL_EPSILON: f64 = 0.1;

/// Turn rates (slerp factor per second) per behavior.
pub const STEADY_TURN_RATE: f64 = 10.0;
pub const SURGE_TURN_RATE: f64 = 15.0;
pub const WEAVE_TURN_RATE: f64 = 8.0;
pub const JUGGERNAUT_TURN_RATE: f64 = 5.0;

/// Surge cruising speed relative to base speed.
pub const SURGE_SPEED_FACTOR: f64 = 1.5;
/// Surge sprint speed relative to base speed.
pub const SURGE_SPRINT_FACTOR: f64 = 2.5;
/// Rate at which surge speed chases its target speed.
pub const SURGE_ACCELERATION: f64 = 5.0;
/// Length of a sprint window (seconds).
pub const SURGE_SPRINT_DURATION: f64 = 2.0;
/// Delay before the first sprint (seconds, uniform range).
pub const SURGE_FIRST_SPRINT_DELAY: (f64, f64) = (3.0, 6.0);
/// Delay between the end of a sprint and the next one (seconds, uniform range).
pub const SURGE_SPRINT_COOLDOWN: (f64, f64) = (4.0, 8.0);

/// Lateral weave amplitude (units).
pub const WEAVE_AMPLITUDE: f64 = 2.0;
/// Weave frequency; the lateral term is `sin(phase * WEAVE_FREQUENCY * PI)`.
pub const WEAVE_FREQUENCY: f64 = 2.0;
/// Relaxed arrival distance for weaving agents.
pub const WEAVE_ARRIVAL_EPSILON: f64 = 1.5;

/// Juggernaut cruising speed relative to base speed.
pub const JUGGERNAUT_SPEED_FACTOR: f64 = 0.5;
/// Rate at which juggernaut cruising speed eases back to normal.
pub const JUGGERNAUT_CRUISE_ACCELERATION: f64 = 2.0;
/// Distance to the waypoint at which a wind-up begins.
pub const JUGGERNAUT_CHARGE_RANGE: f64 = 5.0;
/// Below this distance no new wind-up starts.
pub const JUGGERNAUT_MIN_CHARGE_RANGE: f64 = 0.5;
/// Wind-up duration (seconds).
pub const JUGGERNAUT_WINDUP_SECS: f64 = 1.0;
/// Speed during the wind-up relative to base speed.
pub const JUGGERNAUT_WINDUP_FACTOR: f64 = 0.1;
/// Burst speed relative to base speed.
pub const JUGGERNAUT_BURST_FACTOR: f64 = 3.0;

// --- Behavior stat profiles ---

pub const SURGE_HEALTH_FACTOR: f64 = 0.7;
pub const SURGE_REWARD_FACTOR: f64 = 1.5;
pub const WEAVE_REWARD_FACTOR: f64 = 1.3;
pub const JUGGERNAUT_HEALTH_FACTOR: f64 = 2.5;
pub const JUGGERNAUT_CORE_DAMAGE_FACTOR: f64 = 2.0;
pub const JUGGERNAUT_REWARD_FACTOR: f64 = 2.0;

// --- Waves ---

/// Extra agent health per round index.
pub const DEFAULT_ESCALATION_STEP: u32 = 2;

// --- Session ---

pub const DEFAULT_CORE_HEALTH: u32 = 20;
pub const DEFAULT_STARTING_GOLD: u32 = 100;

// --- Elements ---

/// Base price of one element level.
pub const ELEMENT_BASE_COST: f64 = 50.0;
/// Highest element tier.
pub const MAX_ELEMENT_LEVEL: u8 = 3;
/// Seconds between burn damage ticks.
pub const BURN_TICK_INTERVAL: f64 = 1.0;
/// Search radius for chain jumps around the struck agent.
pub const CHAIN_JUMP_RANGE: f64 = 5.0;
/// Chain damage falloff when the tier potency is not a usable fraction.
pub const CHAIN_DEFAULT_FALLOFF: f64 = 0.5;
