//! User-agent and capability sniffing.
//!
//! [`detect`] is a pure function over an [`EnvProbe`]; the browser front
//! end fills the probe from `navigator`, `document` and `window`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TRIDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("Trident/.*rv:([0-9]{1,}[.0-9]{0,})").unwrap());
static EDGE: LazyLock<Regex> = LazyLock::new(|| Regex::new("Edge/[0-9]+").unwrap());

const IOS_PLATFORMS: &[&str] = &[
    "iPad Simulator",
    "iPhone Simulator",
    "iPod Simulator",
    "iPad",
    "iPhone",
    "iPod",
];

/// Window APIs whose presence dates an iOS release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IosCapabilities {
    pub indexed_db: bool,
    pub speech_synthesis: bool,
    pub webkit_audio_context: bool,
    pub match_media: bool,
    pub push_state: bool,
}

impl IosCapabilities {
    /// Oldest iOS major version that has every capability present.
    pub fn version(&self) -> u8 {
        if self.indexed_db {
            8
        } else if self.speech_synthesis {
            7
        } else if self.webkit_audio_context {
            6
        } else if self.match_media {
            5
        } else if self.push_state {
            4
        } else {
            3
        }
    }
}

/// Raw facts read from the host.
#[derive(Debug, Clone, Default)]
pub struct EnvProbe {
    pub user_agent: String,
    pub app_name: String,
    pub platform: String,
    pub max_touch_points: u32,
    /// `ontouchend` exists on the document.
    pub has_touch_end: bool,
    /// Setting an audio element's volume sticks.
    pub audio_volume_settable: bool,
    pub ios: IosCapabilities,
}

/// Detected browser and platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
    #[serde(rename = "isIE")]
    pub is_ie: bool,
    #[serde(rename = "isEdge")]
    pub is_edge: bool,
    #[serde(rename = "isSafari")]
    pub is_safari: bool,
    #[serde(rename = "isFF")]
    pub is_ff: bool,
    #[serde(rename = "isMac")]
    pub is_mac: bool,
    #[serde(rename = "isTouch")]
    pub is_touch: bool,
    #[serde(rename = "isIOS")]
    pub is_ios: bool,
    #[serde(rename = "isAudioVolume")]
    pub is_audio_volume: bool,
    /// Only set on iOS.
    #[serde(rename = "IOSversion", skip_serializing_if = "Option::is_none")]
    pub ios_version: Option<u8>,
}

/// `true` when "safari" appears before any "chrome" or "android",
/// ignoring case.
fn is_safari(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    let Some(safari) = ua.find("safari") else {
        return false;
    };
    ["chrome", "android"]
        .iter()
        .all(|other| ua.find(other).is_none_or(|pos| pos >= safari))
}

/// Classify the host from a probe.
pub fn detect(probe: &EnvProbe) -> Environment {
    let ua = probe.user_agent.as_str();

    let is_ie = probe.app_name == "Microsoft Internet Explorer"
        || (probe.app_name == "Netscape" && TRIDENT.is_match(ua));
    let is_ios = IOS_PLATFORMS.contains(&probe.platform.as_str())
        || (ua.contains("Mac") && probe.has_touch_end);

    Environment {
        is_ie,
        is_edge: EDGE.is_match(ua),
        is_safari: is_safari(ua),
        is_ff: ua.to_lowercase().contains("firefox"),
        is_mac: probe.platform.to_uppercase().contains("MAC"),
        is_touch: probe.max_touch_points >= 1,
        is_ios,
        is_audio_volume: probe.audio_volume_settable,
        ios_version: is_ios.then(|| probe.ios.version()),
    }
}
