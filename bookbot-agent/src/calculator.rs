//! Physics calculations for robotics questions.
//!
//! Covers torque, force, motion, power, energy, and momentum with the
//! standard introductory formulas. Parameters come either from a typed
//! [`CalculationRequest`] or, best-effort, from unit-suffixed numbers in the
//! query text itself ("2kg", "0.5m", "10 N").

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outcome::{invalid_query_outcome, valid_query, AgentOutcome};

/// Standard gravitational acceleration in m/s².
const STANDARD_GRAVITY: f64 = 9.81;

/// The calculation families the agent can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    Torque,
    Velocity,
    Acceleration,
    Kinematics,
    Dynamics,
    Force,
    Power,
    Energy,
    Momentum,
}

/// Numeric inputs for a calculation. All fields are optional; each
/// calculation kind checks for the combinations it can work with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub mass: Option<f64>,
    pub force: Option<f64>,
    pub distance: Option<f64>,
    pub time: Option<f64>,
    pub height: Option<f64>,
    pub work: Option<f64>,
    pub torque: Option<f64>,
    pub gravity: Option<f64>,
    pub initial_position: Option<f64>,
    pub initial_velocity: Option<f64>,
    pub final_velocity: Option<f64>,
    pub linear_velocity: Option<f64>,
    pub linear_acceleration: Option<f64>,
    pub angular_velocity: Option<f64>,
    pub angular_acceleration: Option<f64>,
    pub moment_of_inertia: Option<f64>,
}

/// An explicit, fully-typed calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub kind: CalculationKind,
    pub parameters: Parameters,
}

/// Scans for numbers with a trailing unit. Longer unit spellings come first
/// so "m/s" is never read as a bare "m" (the regex engine prefers earlier
/// alternatives at the same position).
fn unit_scanner() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(\d+(?:\.\d+)?)\s*(meter per second|m/s|kilogram|kg|newton|meter|metre|second|m|n|s)",
        )
        .expect("unit scanner regex is valid")
    })
}

/// The physics calculation subagent.
#[derive(Debug, Default)]
pub struct CalculationAgent;

impl CalculationAgent {
    pub fn new() -> Self {
        Self
    }

    /// Run a calculation. With a typed request, the query is only used for
    /// input validation; otherwise kind and parameters are parsed from the
    /// query text.
    pub fn execute(&self, query: &str, request: Option<&CalculationRequest>) -> AgentOutcome {
        if !valid_query(query) {
            return invalid_query_outcome();
        }

        let (kind, params) = match request {
            Some(req) => (req.kind, req.parameters.clone()),
            None => match parse_query(query) {
                Some(parsed) => parsed,
                None => {
                    return AgentOutcome::err(
                        "Could not determine calculation type from query. \
                         Please specify what you want to calculate.",
                    )
                }
            },
        };

        debug!(?kind, "running calculation");

        let computed = match kind {
            CalculationKind::Torque => calculate_torque(&params),
            CalculationKind::Velocity => calculate_velocity(&params),
            CalculationKind::Acceleration => calculate_acceleration(&params),
            CalculationKind::Kinematics => calculate_kinematics(&params),
            CalculationKind::Dynamics => calculate_dynamics(&params),
            CalculationKind::Force => calculate_force(&params),
            CalculationKind::Power => calculate_power(&params),
            CalculationKind::Energy => calculate_energy(&params),
            CalculationKind::Momentum => calculate_momentum(&params),
        };

        match computed {
            Ok((result, explanation)) => {
                AgentOutcome::ok(format!("Calculation Result: {result}\n\n{explanation}"))
            }
            Err(_insufficient) => {
                AgentOutcome::err("Could not perform calculation with provided parameters")
            }
        }
    }
}

/// Parse the calculation kind and unit-suffixed parameters from free text.
///
/// A best-effort heuristic: the first kind keyword found wins, and the first
/// number seen for each unit wins. Dynamics is only reachable through an
/// explicit [`CalculationRequest`].
pub fn parse_query(query: &str) -> Option<(CalculationKind, Parameters)> {
    let query = query.to_lowercase();

    let kind_keywords: [(CalculationKind, &[&str]); 8] = [
        (CalculationKind::Torque, &["torque"]),
        (CalculationKind::Force, &["force"]),
        (CalculationKind::Velocity, &["velocity", "speed"]),
        (CalculationKind::Acceleration, &["acceleration"]),
        (CalculationKind::Kinematics, &["kinematics", "position", "displacement"]),
        (CalculationKind::Power, &["power"]),
        (CalculationKind::Energy, &["energy"]),
        (CalculationKind::Momentum, &["momentum"]),
    ];

    let kind = kind_keywords
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
        .map(|(kind, _)| *kind)?;

    let mut params = Parameters::default();
    for capture in unit_scanner().captures_iter(&query) {
        let value: f64 = match capture[1].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let slot = match &capture[2] {
            "kg" | "kilogram" => &mut params.mass,
            "n" | "newton" => &mut params.force,
            "m" | "meter" | "metre" => &mut params.distance,
            "s" | "second" => &mut params.time,
            "m/s" | "meter per second" => &mut params.initial_velocity,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    // A mass on an arm at a distance, with no explicit force: gravitational
    // torque, F = m·g.
    if kind == CalculationKind::Torque
        && params.mass.is_some()
        && params.distance.is_some()
        && params.force.is_none()
    {
        params.force = params.mass.map(|m| m * STANDARD_GRAVITY);
    }

    Some((kind, params))
}

type Computation = std::result::Result<(String, String), String>;

/// F = m × a (Newton's second law).
fn calculate_force(p: &Parameters) -> Computation {
    match (p.mass, p.linear_acceleration) {
        (Some(mass), Some(accel)) => {
            let force = mass * accel;
            Ok((
                format!("{force} N"),
                format!(
                    "Calculated using Newton's second law: F = m × a\n\
                     F = {mass} kg × {accel} m/s² = {force} N"
                ),
            ))
        }
        _ => Err("Insufficient parameters for force calculation. \
                  Need mass and linear acceleration."
            .into()),
    }
}

/// τ = F × r, or τ = I × α.
fn calculate_torque(p: &Parameters) -> Computation {
    if let (Some(force), Some(distance)) = (p.force, p.distance) {
        let torque = force * distance;
        return Ok((
            format!("{torque} N⋅m"),
            format!(
                "Calculated using τ = F × r (perpendicular distance)\n\
                 τ = {force} N × {distance} m = {torque} N⋅m"
            ),
        ));
    }
    if let (Some(inertia), Some(alpha)) = (p.moment_of_inertia, p.angular_acceleration) {
        let torque = inertia * alpha;
        return Ok((
            format!("{torque} N⋅m"),
            format!(
                "Calculated using τ = I × α (angular acceleration)\n\
                 τ = {inertia} kg⋅m² × {alpha} rad/s² = {torque} N⋅m"
            ),
        ));
    }
    Err("Insufficient parameters for torque calculation. Need either \
         (force and distance) or (moment of inertia and angular acceleration)."
        .into())
}

/// v = d/t, or v = u + at.
fn calculate_velocity(p: &Parameters) -> Computation {
    if let (Some(distance), Some(time)) = (p.distance, p.time) {
        if time != 0.0 {
            let velocity = distance / time;
            return Ok((
                format!("{velocity} m/s"),
                format!(
                    "Calculated using v = d/t\n\
                     v = {distance} m / {time} s = {velocity} m/s"
                ),
            ));
        }
    }
    let initial = p.initial_velocity.unwrap_or(0.0);
    if let (Some(accel), Some(time)) = (p.linear_acceleration, p.time) {
        let velocity = initial + accel * time;
        return Ok((
            format!("{velocity} m/s"),
            format!(
                "Calculated using v = u + at\n\
                 v = {initial} m/s + ({accel} m/s² × {time} s) = {velocity} m/s"
            ),
        ));
    }
    Err("Insufficient parameters for velocity calculation. Need either \
         (distance and time) or (initial velocity, acceleration, and time)."
        .into())
}

/// a = Δv/Δt, or a = F/m.
fn calculate_acceleration(p: &Parameters) -> Computation {
    let initial = p.initial_velocity.unwrap_or(0.0);
    if let (Some(final_v), Some(time)) = (p.final_velocity, p.time) {
        if time != 0.0 {
            let accel = (final_v - initial) / time;
            return Ok((
                format!("{accel} m/s²"),
                format!(
                    "Calculated using a = Δv/Δt\n\
                     a = ({final_v} m/s - {initial} m/s) / {time} s = {accel} m/s²"
                ),
            ));
        }
    }
    if let (Some(force), Some(mass)) = (p.force, p.mass) {
        if mass != 0.0 {
            let accel = force / mass;
            return Ok((
                format!("{accel} m/s²"),
                format!(
                    "Calculated using a = F/m (Newton's second law)\n\
                     a = {force} N / {mass} kg = {accel} m/s²"
                ),
            ));
        }
    }
    Err("Insufficient parameters for acceleration calculation. Need either \
         (velocity change and time) or (force and mass)."
        .into())
}

/// s = ut + ½at², v = u + at.
fn calculate_kinematics(p: &Parameters) -> Computation {
    let time = match p.time {
        Some(t) => t,
        None => {
            return Err("Insufficient parameters for kinematic calculation. Need time.".into())
        }
    };
    let initial_position = p.initial_position.unwrap_or(0.0);
    let initial_velocity = p.initial_velocity.unwrap_or(0.0);
    let acceleration = p.linear_acceleration.unwrap_or(0.0);

    let displacement = initial_velocity * time + 0.5 * acceleration * time * time;
    let final_position = initial_position + displacement;
    let final_velocity = initial_velocity + acceleration * time;

    let explanation = format!(
        "Kinematic calculations:\n\
         Initial position: {initial_position} m\n\
         Initial velocity: {initial_velocity} m/s\n\
         Acceleration: {acceleration} m/s²\n\
         Time: {time} s\n\
         Displacement: {displacement} m\n\
         Final position: {final_position} m\n\
         Final velocity: {final_velocity} m/s"
    );
    Ok((
        format!("Position: {final_position:.2} m, Velocity: {final_velocity:.2} m/s"),
        explanation,
    ))
}

/// Net acceleration and momentum from mass and force.
fn calculate_dynamics(p: &Parameters) -> Computation {
    match (p.mass, p.force) {
        (Some(mass), Some(force)) if mass != 0.0 => {
            let acceleration = force / mass;
            let momentum = mass * p.linear_velocity.unwrap_or(0.0);
            let explanation = format!(
                "Dynamics calculation:\n\
                 Mass: {mass} kg\n\
                 Force: {force} N\n\
                 Acceleration: {acceleration} m/s²\n\
                 Momentum: {momentum} kg⋅m/s"
            );
            Ok((
                format!("Acceleration: {acceleration:.2} m/s², Momentum: {momentum:.2} kg⋅m/s"),
                explanation,
            ))
        }
        _ => Err("Insufficient parameters for dynamic calculation. Need mass and force.".into()),
    }
}

/// P = F×v, P = W/t, or P = τ×ω.
fn calculate_power(p: &Parameters) -> Computation {
    if let (Some(force), Some(velocity)) = (p.force, p.linear_velocity) {
        let power = force * velocity;
        return Ok((
            format!("{power} W"),
            format!(
                "Calculated using P = F × v\n\
                 P = {force} N × {velocity} m/s = {power} W"
            ),
        ));
    }
    if let (Some(work), Some(time)) = (p.work, p.time) {
        if time != 0.0 {
            let power = work / time;
            return Ok((
                format!("{power} W"),
                format!(
                    "Calculated using P = W/t\n\
                     P = {work} J / {time} s = {power} W"
                ),
            ));
        }
    }
    if let (Some(torque), Some(omega)) = (p.torque, p.angular_velocity) {
        let power = torque * omega;
        return Ok((
            format!("{power} W"),
            format!(
                "Calculated using P = τ × ω\n\
                 P = {torque} N⋅m × {omega} rad/s = {power} W"
            ),
        ));
    }
    Err("Insufficient parameters for power calculation. Need either (force and \
         velocity), (work and time), or (torque and angular velocity)."
        .into())
}

/// KE = ½mv², PE = mgh. Reports whichever the parameters allow.
fn calculate_energy(p: &Parameters) -> Computation {
    let mass = match p.mass {
        Some(m) => m,
        None => {
            return Err("Insufficient parameters for energy calculation. Need mass \
                        and either velocity (for KE) or height (for PE)."
                .into())
        }
    };
    let gravity = p.gravity.unwrap_or(STANDARD_GRAVITY);

    let mut results = Vec::new();
    let mut explanations = Vec::new();

    let velocity = p.linear_velocity.unwrap_or(0.0);
    let kinetic = 0.5 * mass * velocity * velocity;
    results.push(format!("KE: {kinetic:.2} J"));
    explanations.push(format!(
        "Kinetic energy: KE = ½mv² = 0.5 × {mass} kg × ({velocity} m/s)² = {kinetic:.2} J"
    ));

    if let Some(height) = p.height {
        let potential = mass * gravity * height;
        results.push(format!("PE: {potential:.2} J"));
        explanations.push(format!(
            "Potential energy: PE = mgh = {mass} kg × {gravity} m/s² × {height} m = {potential:.2} J"
        ));
    }

    Ok((results.join(", "), explanations.join("\n")))
}

/// p = m × v.
fn calculate_momentum(p: &Parameters) -> Computation {
    match (p.mass, p.linear_velocity) {
        (Some(mass), Some(velocity)) => {
            let momentum = mass * velocity;
            Ok((
                format!("{momentum} kg⋅m/s"),
                format!(
                    "Calculated using p = m × v\n\
                     p = {mass} kg × {velocity} m/s = {momentum} kg⋅m/s"
                ),
            ))
        }
        _ => Err("Insufficient parameters for momentum calculation. Need mass and velocity.".into()),
    }
}
