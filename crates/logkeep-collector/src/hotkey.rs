//! 기본 내보내기 단축키.
//!
//! Apple 플랫폼은 Cmd+Shift+1, 그 외는 Ctrl+Shift+1.
//! 호스트가 키 down/up 이벤트를 넘겨주면 명시적 상태 플래그로 조합을 판정한다
//! (네이티브 modifier 조회에 의존하지 않음). 발동 후 모든 플래그를 초기화해
//! 키를 누르고 있어도 반복 발동하지 않는다.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::info;

use crate::trigger::ExportTrigger;

/// 단축키 판정 기준 플랫폼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS / iOS — Meta(Cmd) 키 사용
    Apple,
    /// 그 외 — Control 키 사용
    Other,
}

impl Platform {
    /// 컴파일 대상 플랫폼
    pub fn current() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            Self::Apple
        } else {
            Self::Other
        }
    }

    /// 주 modifier 키 이름 (소문자)
    pub fn primary_modifier(&self) -> &'static str {
        match self {
            Self::Apple => "meta",
            Self::Other => "control",
        }
    }
}

const SHIFT: &str = "shift";
const EXPORT_KEY: &str = "1";

/// 키 이름 정규화 — Shift와 함께 누른 `1`은 `!`로 들어온다
fn normalize(key: &str) -> String {
    let key = key.to_lowercase();
    if key == "!" {
        EXPORT_KEY.to_string()
    } else {
        key
    }
}

/// 내보내기 단축키 상태 추적기
#[derive(Debug)]
pub struct ExportHotkey {
    platform: Platform,
    pressed: Mutex<HashMap<String, bool>>,
    trigger: ExportTrigger,
}

impl ExportHotkey {
    pub fn new(platform: Platform, trigger: ExportTrigger) -> Self {
        info!(
            "내보내기 단축키 등록: {}+Shift+1",
            match platform {
                Platform::Apple => "Cmd",
                Platform::Other => "Ctrl",
            }
        );
        Self {
            platform,
            pressed: Mutex::new(HashMap::new()),
            trigger,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// 키 누름 — 조합이 완성되면 내보내기를 요청하고 true 반환
    pub fn key_down(&self, key: &str) -> bool {
        let fired = {
            let mut pressed = self.pressed.lock();
            pressed.insert(normalize(key), true);

            let is_down = |name: &str| pressed.get(name).copied().unwrap_or(false);
            let combo = is_down(self.platform.primary_modifier())
                && is_down(SHIFT)
                && is_down(EXPORT_KEY);

            if combo {
                pressed.values_mut().for_each(|down| *down = false);
            }
            combo
        };

        if fired {
            self.trigger.fire();
        }
        fired
    }

    /// 키 뗌
    pub fn key_up(&self, key: &str) {
        self.pressed.lock().insert(normalize(key), false);
    }
}
