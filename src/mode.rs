use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  #[default]
  Default,
  Input,
}
