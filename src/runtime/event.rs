use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};

/// Container lifecycle transitions this relay knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Start,
    Stop,
    Restart,
    Kill,
    Die,
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            "kill" => Ok(Self::Kill),
            "die" => Ok(Self::Die),
            _ => Err(anyhow!("unsupported event status {s}")),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Kill => "kill",
            Self::Die => "die",
        };
        f.write_str(status)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeEvent {
    pub kind: EventKind,
    /// Id of the container the event is about.
    pub id: String,
    /// Image reference the container was created from, `repo[:tag]`.
    pub from: String,
}
