//! 내보내기 요청 콜백.
//!
//! 외부 코드가 등록한 콜백 하나를 보관하고, 요청 시 호출한다.
//! 단축키와 `LogCollector::trigger_export()`가 같은 핸들을 공유한다.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

type ExportCallback = Arc<dyn Fn() + Send + Sync>;

/// 복제 가능한 내보내기 트리거 핸들
#[derive(Clone, Default)]
pub struct ExportTrigger {
    callback: Arc<Mutex<Option<ExportCallback>>>,
}

impl ExportTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 콜백 등록 (기존 콜백은 교체)
    pub fn set<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.callback.lock() = Some(Arc::new(callback));
    }

    /// 콜백 호출 — 등록된 콜백이 없으면 아무것도 하지 않는다.
    ///
    /// 콜백은 잠금 밖에서 호출되므로 콜백 안에서 다시 `set`/`fire`를 불러도 된다.
    pub fn fire(&self) -> bool {
        let callback = self.callback.lock().clone();
        match callback {
            Some(callback) => {
                debug!("내보내기 요청");
                callback();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ExportTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportTrigger")
            .field("registered", &self.callback.lock().is_some())
            .finish()
    }
}
