//! Platform detection for choosing the shortcut modifier.

use std::sync::OnceLock;

/// Cached platform detection results.
#[derive(Debug, Clone, Default)]
pub struct Platform {
    pub ios: bool,
    pub mac: bool,
}

impl Platform {
    /// Apple platforms use Cmd for shortcuts.
    pub fn uses_meta_shortcuts(&self) -> bool {
        self.mac || self.ios
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// Get cached platform info. Detection runs once on first call.
pub fn platform() -> &'static Platform {
    PLATFORM.get_or_init(detect_platform)
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
fn detect_platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::default();
    };
    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default().to_lowercase();
    let platform_str = navigator.platform().unwrap_or_default().to_lowercase();
    classify(&user_agent, &platform_str)
}

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn detect_platform() -> Platform {
    classify("", "")
}

fn classify(user_agent: &str, platform_str: &str) -> Platform {
    let ios = user_agent.contains("iphone")
        || user_agent.contains("ipad")
        || user_agent.contains("ipod");
    let mac = platform_str.contains("mac") && !ios;
    Platform { ios, mac }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let mac = classify("mozilla/5.0 (macintosh; intel mac os x 14_0)", "macintel");
        assert!(mac.mac && !mac.ios);
        assert!(mac.uses_meta_shortcuts());

        let ipad = classify("mozilla/5.0 (ipad; cpu os 17_0 like mac os x)", "macintel");
        assert!(ipad.ios && !ipad.mac);

        let linux = classify("mozilla/5.0 (x11; linux x86_64)", "linux x86_64");
        assert!(!linux.uses_meta_shortcuts());
    }
}
