//! Canned explanations of core robotics concepts.
//!
//! A static library of five concepts, each written for three audience
//! levels. Concept names are normalized through an alias table first
//! ("ik" resolves to "inverse kinematics").

use serde::{Deserialize, Serialize};

use crate::outcome::{invalid_query_outcome, valid_query, AgentOutcome};

/// How deep the explanation should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Audience {
    /// Parse an audience label; anything unrecognized falls back to
    /// intermediate.
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }
}

/// A request for a concept explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub concept: String,
    pub audience: Audience,
    pub include_examples: bool,
}

struct LevelEntry {
    explanation: &'static str,
    examples: &'static str,
}

struct ConceptEntry {
    beginner: LevelEntry,
    intermediate: LevelEntry,
    advanced: LevelEntry,
}

impl ConceptEntry {
    fn level(&self, audience: Audience) -> &LevelEntry {
        match audience {
            Audience::Beginner => &self.beginner,
            Audience::Intermediate => &self.intermediate,
            Audience::Advanced => &self.advanced,
        }
    }
}

/// The concept-explanation subagent.
#[derive(Debug, Default)]
pub struct ExplanationAgent;

impl ExplanationAgent {
    pub fn new() -> Self {
        Self
    }

    /// Explain the requested concept at the requested level.
    pub fn execute(&self, query: &str, request: Option<&ExplanationRequest>) -> AgentOutcome {
        if !valid_query(query) {
            return invalid_query_outcome();
        }
        let request = match request {
            Some(req) => req,
            None => return AgentOutcome::err("Missing context for explanation"),
        };

        let concept = normalize_concept(&request.concept);
        let entry = match lookup(&concept) {
            Some(entry) => entry,
            None => {
                return AgentOutcome::err(format!(
                    "Could not find explanation for concept: {concept}"
                ))
            }
        };

        let level = entry.level(request.audience);
        let mut text = level.explanation.to_string();
        if request.include_examples {
            text.push_str(&format!("\n\nExamples: {}", level.examples));
        }
        AgentOutcome::ok(text)
    }
}

/// Lowercase, trim, drop connecting words, and resolve aliases.
pub fn normalize_concept(concept: &str) -> String {
    let mut normalized = concept.to_lowercase().trim().to_string();
    for word in ["for", "in", "on", "with", "the", "a", "an", "and"] {
        normalized = normalized.replace(&format!(" {word} "), " ");
    }

    match normalized.as_str() {
        "pid" | "pid controller" => "pid control".into(),
        "inverse kinematic" | "ik" => "inverse kinematics".into(),
        "simultaneous localization and mapping" | "simultaneous localization mapping" => {
            "slam".into()
        }
        "robot operating system" | "ros2" => "ros".into(),
        "machine vision" | "robot vision" => "computer vision".into(),
        _ => normalized,
    }
}

fn lookup(concept: &str) -> Option<&'static ConceptEntry> {
    match concept {
        "pid control" => Some(&PID_CONTROL),
        "inverse kinematics" => Some(&INVERSE_KINEMATICS),
        "slam" => Some(&SLAM),
        "ros" => Some(&ROS),
        "computer vision" => Some(&COMPUTER_VISION),
        _ => None,
    }
}

static PID_CONTROL: ConceptEntry = ConceptEntry {
    beginner: LevelEntry {
        explanation: "PID control is like having a smart assistant that helps robots move precisely. Imagine trying to stop your car exactly at a stop sign - PID control is like your brain constantly adjusting the pressure on the brake pedal to stop perfectly at the line.",
        examples: "A robot arm using PID to move to a precise position, or a drone maintaining a steady altitude.",
    },
    intermediate: LevelEntry {
        explanation: "PID (Proportional-Integral-Derivative) control is a feedback control mechanism that calculates an error value as the difference between a desired setpoint and a measured process variable. It adjusts the process control inputs using a weighted sum of three terms: Proportional (P) - immediate response to current error, Integral (I) - correction for accumulated past errors, Derivative (D) - prediction of future errors based on current rate of change.",
        examples: "Controlling motor speed, robot trajectory following, temperature control in manufacturing.",
    },
    advanced: LevelEntry {
        explanation: "PID controllers implement the control law: u(t) = K_p e(t) + K_i ∫e(t)dt + K_d de(t)/dt, where K_p, K_i, and K_d are the proportional, integral, and derivative gains respectively. The controller parameters are typically tuned using methods like Ziegler-Nichols, Cohen-Coon, or optimization algorithms to achieve desired response characteristics like minimal overshoot, fast settling time, and good disturbance rejection.",
        examples: "Multi-DOF robot joint control with cross-coupling compensation, adaptive PID for time-varying systems, cascade PID structures for complex systems.",
    },
};

static INVERSE_KINEMATICS: ConceptEntry = ConceptEntry {
    beginner: LevelEntry {
        explanation: "Inverse kinematics is like figuring out how to move your arm joints to touch a specific point. If you want to touch your nose, your brain calculates how much to bend your shoulder, elbow, and wrist. For robots, it's the math that figures out how to position all the joints to reach a specific location.",
        examples: "A robot arm reaching for an object, a character in a video game moving their hand to grab something.",
    },
    intermediate: LevelEntry {
        explanation: "Inverse kinematics (IK) is the mathematical process of determining the joint parameters (angles, displacements) needed to position the robot's end-effector at a desired location and orientation. Unlike forward kinematics (which computes end-effector position from joint angles), IK computes joint angles from desired end-effector position. The solution can be analytical (closed-form) for simple chains or numerical using iterative methods like Jacobian-based techniques.",
        examples: "6-DOF robotic arm reaching tasks, legged robot foot placement, humanoid robot manipulation tasks.",
    },
    advanced: LevelEntry {
        explanation: "IK solutions involve solving the equation f(θ) = x, where f represents the forward kinematics function, θ is the vector of joint angles, and x is the desired end-effector pose. Analytical solutions exist for specific geometries (e.g., intersecting axes). Numerical methods include Jacobian transpose, pseudoinverse, and damped least squares (DLS). For redundant systems, additional criteria like joint limit avoidance and obstacle avoidance can be incorporated as optimization objectives.",
        examples: "Redundant manipulators with null-space optimization, multi-task IK with prioritization, real-time IK for human motion reconstruction.",
    },
};

static SLAM: ConceptEntry = ConceptEntry {
    beginner: LevelEntry {
        explanation: "SLAM (Simultaneous Localization and Mapping) is like exploring an unknown cave while drawing a map and keeping track of where you are at the same time. A robot uses sensors to build a map of its environment while simultaneously figuring out where it is located within that map.",
        examples: "A robot vacuum mapping your house while cleaning, self-driving cars understanding their location on the road.",
    },
    intermediate: LevelEntry {
        explanation: "SLAM is a computational problem where a robot constructs or updates a map of an unknown environment while simultaneously keeping track of its location within that map. It addresses the 'chicken and egg' problem: you need a map to determine where you are, but you need to know where you are to build a consistent map. Common approaches include EKF-SLAM, FastSLAM, and graph-based SLAM methods.",
        examples: "Mobile robot navigation, augmented reality applications, planetary exploration rovers.",
    },
    advanced: LevelEntry {
        explanation: "SLAM formulations typically address the posterior p(x_t, m | z_1:t, u_1:t-1), where x_t is robot state, m is map, z are measurements, and u are controls. Approaches include filtering methods (EKF, particle filters), smoothing methods (graph optimization), and hybrid approaches. Key challenges include data association (feature matching), loop closure detection, and scalability to large environments. Modern approaches leverage deep learning for feature extraction and end-to-end learning.",
        examples: "Large-scale 3D mapping with LiDAR, multi-robot cooperative SLAM, lifelong SLAM for persistent environments.",
    },
};

static ROS: ConceptEntry = ConceptEntry {
    beginner: LevelEntry {
        explanation: "ROS (Robot Operating System) is like a universal language and toolset that helps different robot parts communicate with each other. It's a middleware that lets sensors, controllers, and applications work together, no matter who built each part.",
        examples: "A camera and an arm on a robot communicating to pick up objects, different software packages working together in a single robot system.",
    },
    intermediate: LevelEntry {
        explanation: "ROS (Robot Operating System) is a flexible framework for writing robot software that provides services like hardware abstraction, device drivers, libraries, visualizers, message-passing, and package management. It uses a distributed computing model where processes (nodes) communicate via messages on topics (publish-subscribe) or services (request-response). ROS2 adds quality of service features, multi-robot support, and improved security.",
        examples: "Sensor fusion applications, multi-robot coordination, simulation integration with Gazebo.",
    },
    advanced: LevelEntry {
        explanation: "ROS/ROS2 implements a graph-based architecture with nodes (processes), topics (named buses), services (synchronous communication), and actions (goal-oriented communication). Middleware includes DDS implementations for ROS2 (Fast DDS, Cyclone DDS, RTI Connext) for robust message passing. Key concepts include roscore/master, parameter server, tf transform library, and package management with catkin/colcon. Real-time performance considerations and security frameworks are important for deployment.",
        examples: "Real-time control with ROS2, secure multi-robot systems, performance optimization for embedded platforms.",
    },
};

static COMPUTER_VISION: ConceptEntry = ConceptEntry {
    beginner: LevelEntry {
        explanation: "Computer vision is how robots 'see' and understand the world around them, similar to how your eyes and brain work together to recognize objects. It's the technology that allows robots to identify things like a red ball, a person's face, or a door.",
        examples: "A robot recognizing objects on a table, self-driving cars detecting pedestrians and road signs.",
    },
    intermediate: LevelEntry {
        explanation: "Computer vision in robotics involves processing and analyzing visual data from cameras to extract meaningful information for navigation, manipulation, and interaction. It includes techniques like image filtering, edge detection, feature extraction, object recognition, and 3D reconstruction. In robotics, it's used for visual servoing, object tracking, and scene understanding.",
        examples: "Visual servoing for robot arm control, object detection for pick-and-place tasks, visual SLAM.",
    },
    advanced: LevelEntry {
        explanation: "Robot vision systems integrate perception with action, often involving real-time processing, sensor fusion, and uncertainty handling. Key challenges include dealing with varying lighting conditions, partial observability, and computational constraints. Advanced techniques include deep learning for object detection/classification, geometric computer vision for 3D understanding, and learning from demonstration for visual tasks.",
        examples: "Deep learning-based manipulation planning, vision-based navigation in dynamic environments, multimodal perception combining vision with other sensors.",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    fn request(concept: &str, audience: Audience, examples: bool) -> ExplanationRequest {
        ExplanationRequest {
            concept: concept.into(),
            audience,
            include_examples: examples,
        }
    }

    #[test]
    fn explains_known_concept_with_examples() {
        let outcome = ExplanationAgent::new().execute(
            "Explain PID control",
            Some(&request("pid control", Audience::Beginner, true)),
        );
        assert!(outcome.success);
        let text = outcome.result.unwrap();
        assert!(text.contains("smart assistant"));
        assert!(text.contains("\n\nExamples: "));
    }

    #[test]
    fn examples_omitted_when_not_requested() {
        let outcome = ExplanationAgent::new().execute(
            "Explain SLAM",
            Some(&request("slam", Audience::Intermediate, false)),
        );
        assert!(!outcome.result.unwrap().contains("Examples:"));
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(normalize_concept("IK"), "inverse kinematics");
        assert_eq!(normalize_concept("ROS2"), "ros");
        assert_eq!(normalize_concept("machine vision"), "computer vision");
        assert_eq!(normalize_concept("PID"), "pid control");
    }

    #[test]
    fn unknown_audience_falls_back_to_intermediate() {
        assert_eq!(Audience::parse("expert"), Audience::Intermediate);
        assert_eq!(Audience::parse("Beginner"), Audience::Beginner);
    }

    #[test]
    fn unknown_concept_is_reported() {
        let outcome = ExplanationAgent::new().execute(
            "Explain flux capacitors",
            Some(&request("flux capacitor", Audience::Intermediate, false)),
        );
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("flux capacitor"));
    }

    #[test]
    fn missing_request_is_reported() {
        let outcome = ExplanationAgent::new().execute("Explain PID", None);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Missing context for explanation"));
    }
}
