//! Commands accepted by a cleaning session
//!
//! Text form (used by scripts and the simulator):
//! `select:<area>`, `select:whole-bus`, `toggle:<method>`, `methods:<m1>,<m2>`,
//! `clear:<area>`, `clear-all`, `confirm`, `skip`, `reset`

use crate::domain::types::{AreaId, CleaningMethod, MethodSet, WHOLE_BUS_ID};
use anyhow::{anyhow, bail};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectArea(AreaId),
    SelectWholeBus,
    ToggleMethod(CleaningMethod),
    /// Replace the focused area's methods; an empty set deselects it
    UpdateMethods(MethodSet),
    Clear(AreaId),
    ClearAll,
    Confirm,
    Skip,
    Reset,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectArea(_) => "select_area",
            Command::SelectWholeBus => "select_whole_bus",
            Command::ToggleMethod(_) => "toggle_method",
            Command::UpdateMethods(_) => "update_methods",
            Command::Clear(_) => "clear",
            Command::ClearAll => "clear_all",
            Command::Confirm => "confirm",
            Command::Skip => "skip",
            Command::Reset => "reset",
        }
    }
}

fn parse_area(id: &str) -> anyhow::Result<AreaId> {
    AreaId::parse(id).ok_or_else(|| anyhow!("unknown area '{}'", id))
}

fn parse_method(id: &str) -> anyhow::Result<CleaningMethod> {
    CleaningMethod::parse(id).ok_or_else(|| anyhow!("unknown cleaning method '{}'", id))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg.trim())),
            None => (s, None),
        };

        let command = match (verb, arg) {
            ("select", Some(WHOLE_BUS_ID)) => Command::SelectWholeBus,
            ("select", Some(id)) => Command::SelectArea(parse_area(id)?),
            ("toggle", Some(id)) => Command::ToggleMethod(parse_method(id)?),
            ("methods", Some(list)) => {
                let methods = list
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(parse_method)
                    .collect::<anyhow::Result<MethodSet>>()?;
                Command::UpdateMethods(methods)
            }
            ("clear", Some(id)) => Command::Clear(parse_area(id)?),
            ("clear-all", None) => Command::ClearAll,
            ("confirm", None) => Command::Confirm,
            ("skip", None) => Command::Skip,
            ("reset", None) => Command::Reset,
            _ => bail!("unrecognized command '{}'", s),
        };
        Ok(command)
    }
}
