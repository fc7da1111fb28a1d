//! Municipal authorities that issue demand notes.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issuing authority of a demand note.
///
/// The parsing service selects its DN layout by the authority id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    #[serde(rename = "mcgm")]
    Mcgm,
    #[serde(rename = "mbmc")]
    Mbmc,
    #[serde(rename = "kdmc")]
    Kdmc,
    #[serde(rename = "nmmc")]
    Nmmc,
    #[serde(rename = "midc-type1")]
    MidcType1,
    #[serde(rename = "midc-type2")]
    MidcType2,
}

impl Authority {
    pub const ALL: [Authority; 6] = [
        Authority::Mcgm,
        Authority::Mbmc,
        Authority::Kdmc,
        Authority::Nmmc,
        Authority::MidcType1,
        Authority::MidcType2,
    ];

    /// Identifier sent to the parsing service.
    pub fn id(self) -> &'static str {
        match self {
            Authority::Mcgm => "mcgm",
            Authority::Mbmc => "mbmc",
            Authority::Kdmc => "kdmc",
            Authority::Nmmc => "nmmc",
            Authority::MidcType1 => "midc-type1",
            Authority::MidcType2 => "midc-type2",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Authority::Mcgm => "MCGM",
            Authority::Mbmc => "MBMC",
            Authority::Kdmc => "KDMC",
            Authority::Nmmc => "NMMC",
            Authority::MidcType1 => "MIDC Type 1",
            Authority::MidcType2 => "MIDC Type 2",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Authority {
    type Err = CoreError;

    /// Accepts the id or the label, ignoring case, spaces, dashes and underscores.
    fn from_str(s: &str) -> CoreResult<Self> {
        let squash = |v: &str| -> String {
            v.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let wanted = squash(s);
        Authority::ALL
            .into_iter()
            .find(|a| squash(a.id()) == wanted || squash(a.label()) == wanted)
            .ok_or_else(|| CoreError::UnknownAuthority {
                name: s.trim().to_string(),
                known: Authority::ALL
                    .iter()
                    .map(|a| a.id())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
