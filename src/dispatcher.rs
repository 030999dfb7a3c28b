//! Spoken-command front end.
//!
//! Pattern-matches one line of transcribed speech to a thermostat command,
//! runs it through the client, and renders a spoken reply. Destructive
//! turn-off requests are gated behind a confirmation sub-dialog.
//!
//! The dispatcher owns all user-facing phrasing; client errors are logged
//! here and narrated as a generic apology so the user never assumes a
//! partial success.

use log::warn;
use regex::Regex;

use crate::client::{EcobeeClient, Transport};
use crate::models::ecobee::HvacMode;

/// Sanity bounds for a spoken hold temperature, in degrees Fahrenheit.
pub const MIN_HOLD_TEMP_F: f64 = 50.0;
pub const MAX_HOLD_TEMP_F: f64 = 90.0;

const APOLOGY: &str = "Sorry, I couldn't access the thermostat.";

/// Which system the user named. "Air" maps to the cool mode on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpokenSystem {
    Heat,
    Air,
}

impl SpokenSystem {
    fn from_match(raw: &str) -> SpokenSystem {
        if raw.eq_ignore_ascii_case("heat") {
            SpokenSystem::Heat
        } else {
            SpokenSystem::Air
        }
    }

    fn mode(self) -> HvacMode {
        match self {
            SpokenSystem::Heat => HvacMode::Heat,
            SpokenSystem::Air => HvacMode::Cool,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            SpokenSystem::Heat => "heat",
            SpokenSystem::Air => "air conditioning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Adjust { system: SpokenSystem, direction: Direction },
    SetTo { system: SpokenSystem, deg_f: f64 },
    TurnOff(SpokenSystem),
    TurnOn(SpokenSystem),
    QueryTemperature { location: Option<String> },
    Confirm,
    Deny,
}

/// Compiled command patterns. Matching order matters: the control phrases
/// are tried before the bare confirmation words.
struct Patterns {
    adjust: Regex,
    set_to: Regex,
    turn_off: Regex,
    turn_on: Regex,
    query: Regex,
    confirm: Regex,
    deny: Regex,
}

impl Patterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Patterns {
            adjust: Regex::new(r"(?i)turn the (heat|air(?: conditioning)?) (up|down)")?,
            set_to: Regex::new(r"(?i)set the (heat|air(?: conditioning)?) (?:at|to) (\d+)")?,
            turn_off: Regex::new(r"(?i)turn the (heat|air(?: conditioning)?) off")?,
            turn_on: Regex::new(r"(?i)turn the (heat|air(?: conditioning)?) on")?,
            query: Regex::new(
                r"(?i)what(?:'s|s| is) the temperature( in (?:here|the (?:apartment|house|room)))?",
            )?,
            confirm: Regex::new(r"(?i)^\s*(?:yes|yeah|yep|sure|okay|ok|confirm|do it|please do)\b")?,
            deny: Regex::new(r"(?i)^\s*(?:no|nope|cancel|never ?mind|don't)\b")?,
        })
    }

    fn parse(&self, text: &str) -> Option<Command> {
        if let Some(c) = self.turn_off.captures(text) {
            return Some(Command::TurnOff(SpokenSystem::from_match(&c[1])));
        }
        if let Some(c) = self.turn_on.captures(text) {
            return Some(Command::TurnOn(SpokenSystem::from_match(&c[1])));
        }
        if let Some(c) = self.adjust.captures(text) {
            let direction = if c[2].eq_ignore_ascii_case("up") {
                Direction::Up
            } else {
                Direction::Down
            };
            return Some(Command::Adjust {
                system: SpokenSystem::from_match(&c[1]),
                direction,
            });
        }
        if let Some(c) = self.set_to.captures(text) {
            let deg_f = c[2].parse::<f64>().ok()?;
            return Some(Command::SetTo {
                system: SpokenSystem::from_match(&c[1]),
                deg_f,
            });
        }
        if let Some(c) = self.query.captures(text) {
            return Some(Command::QueryTemperature {
                location: c.get(1).map(|m| m.as_str().to_lowercase()),
            });
        }
        if self.confirm.is_match(text) {
            return Some(Command::Confirm);
        }
        if self.deny.is_match(text) {
            return Some(Command::Deny);
        }
        None
    }
}

/// A destructive action waiting on the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    TurnOff(SpokenSystem),
}

pub struct Dispatcher<T: Transport> {
    client: EcobeeClient<T>,
    patterns: Patterns,
    pending: Option<Pending>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(client: EcobeeClient<T>) -> Result<Self, regex::Error> {
        Ok(Dispatcher {
            client,
            patterns: Patterns::new()?,
            pending: None,
        })
    }

    /// Handle one line of transcribed speech. Returns the spoken reply, or
    /// `None` when the line matches no command (a pending confirmation is
    /// kept until the user answers or issues a different command).
    pub fn handle(&mut self, text: &str) -> Option<String> {
        match self.patterns.parse(text)? {
            Command::Confirm => match self.pending.take() {
                Some(Pending::TurnOff(system)) => Some(self.finish_turn_off(system)),
                None => None,
            },
            Command::Deny => {
                if self.pending.take().is_some() {
                    Some("Okay, leaving it alone.".to_string())
                } else {
                    None
                }
            }
            Command::TurnOff(system) => {
                self.pending = Some(Pending::TurnOff(system));
                Some(format!("Are you sure you want to turn the {} off?", system.phrase()))
            }
            Command::Adjust { system, direction } => {
                self.pending = None;
                Some(self.adjust(system, direction))
            }
            Command::SetTo { system, deg_f } => {
                self.pending = None;
                Some(self.set_to(system, deg_f))
            }
            Command::TurnOn(system) => {
                self.pending = None;
                Some(self.turn_on(system))
            }
            Command::QueryTemperature { location } => {
                self.pending = None;
                Some(self.query_temperature(location.as_deref()))
            }
        }
    }

    /// Nudge the current hold by one degree in the given direction.
    fn adjust(&self, system: SpokenSystem, direction: Direction) -> String {
        let state = match self.client.get_state() {
            Ok(s) => s,
            Err(e) => {
                warn!("state query failed: {}", e);
                return APOLOGY.to_string();
            }
        };

        // No hold to nudge when the system is off.
        let Some(hold) = state.hold_temp_f else {
            return APOLOGY.to_string();
        };
        let new_temp = hold
            + match direction {
                Direction::Up => 1.0,
                Direction::Down => -1.0,
            };
        if new_temp < MIN_HOLD_TEMP_F {
            return APOLOGY.to_string();
        }

        let reply = format!(
            "Adjusting the thermostat to hold the {} at {} degrees.",
            narrated_system(state.hvac_mode),
            new_temp as i64
        );
        match self.client.set_hold_temperature(new_temp, system.mode()) {
            Ok(()) => reply,
            Err(e) => {
                warn!("hold update failed: {}", e);
                APOLOGY.to_string()
            }
        }
    }

    /// Hold at an absolute temperature, gated to a sane spoken range.
    fn set_to(&self, system: SpokenSystem, deg_f: f64) -> String {
        if !(MIN_HOLD_TEMP_F..=MAX_HOLD_TEMP_F).contains(&deg_f) {
            return "Sorry, I couldn't understand that temperature.".to_string();
        }

        let state = match self.client.get_state() {
            Ok(s) => s,
            Err(e) => {
                warn!("state query failed: {}", e);
                return APOLOGY.to_string();
            }
        };

        let reply = format!(
            "Adjusting the thermostat to hold the {} at {} degrees.",
            narrated_system(state.hvac_mode),
            deg_f as i64
        );
        match self.client.set_hold_temperature(deg_f, system.mode()) {
            Ok(()) => reply,
            Err(e) => {
                warn!("hold update failed: {}", e);
                APOLOGY.to_string()
            }
        }
    }

    /// Execute a confirmed turn-off.
    fn finish_turn_off(&self, system: SpokenSystem) -> String {
        match self.client.turn_off() {
            Ok(()) => format!("Okay, the {} has been turned off.", system.phrase()),
            Err(e) => {
                warn!("turn off failed: {}", e);
                APOLOGY.to_string()
            }
        }
    }

    fn turn_on(&self, system: SpokenSystem) -> String {
        if let Err(e) = self.client.turn_on(system.mode()) {
            warn!("turn on failed: {}", e);
            return APOLOGY.to_string();
        }

        // Best effort: narrate the resumed hold if the follow-up query works.
        match self.client.get_state() {
            Ok(state) => match state.hold_temp_f {
                Some(hold) => format!(
                    "The {} has been turned on and is holding at {} degrees.",
                    system.phrase(),
                    hold as i64
                ),
                None => format!("The {} has been turned on.", system.phrase()),
            },
            Err(e) => {
                warn!("state query after turn on failed: {}", e);
                format!("The {} has been turned on.", system.phrase())
            }
        }
    }

    fn query_temperature(&self, location: Option<&str>) -> String {
        let state = match self.client.get_state() {
            Ok(s) => s,
            Err(e) => {
                warn!("state query failed: {}", e);
                return APOLOGY.to_string();
            }
        };

        let mut reply = format!(
            "It is {} degrees{}.",
            state.room_temp_f.floor() as i64,
            location.unwrap_or("")
        );
        if let Some(hold) = state.hold_temp_f {
            reply.push_str(&format!(
                " The thermostat is holding the {} at {} degrees.",
                narrated_system(state.hvac_mode),
                hold as i64
            ));
        }
        reply
    }
}

/// The spoken word for the device's current mode.
fn narrated_system(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Heat => "heat",
        _ => "air conditioning",
    }
}
