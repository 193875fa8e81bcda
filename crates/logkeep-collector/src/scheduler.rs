//! 자동 정리 루프.
//!
//! 주기마다 만료 정리를 실행한다. 정리 직전 런타임에 한 번 양보해
//! 더 급한 작업을 먼저 처리하게 한다 (유휴 시간 실행 힌트).
//! 종료 신호는 틱보다 먼저 확인하고 정리 직전에 한 번 더 확인한다.
//! 진행 중인 정리는 끝까지 실행된다.

use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::collector::LogCollector;

/// 자동 정리 태스크 시작 — tokio 런타임 밖이면 None
pub(crate) fn spawn_auto_clean(
    collector: Weak<LogCollector>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            warn!("tokio 런타임 밖에서 생성됨 — 자동 정리 비활성화");
            return None;
        }
    };

    info!("자동 정리 시작: 주기={}ms", period.as_millis());

    Some(handle.spawn(async move {
        // 첫 실행은 한 주기 뒤
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let Some(collector) = collector.upgrade() else {
                break;
            };

            tokio::task::yield_now().await;
            // 양보하는 사이 destroy()가 불렸을 수 있다
            if *shutdown_rx.borrow() {
                break;
            }
            let report = collector.clean_expired_logs().await;
            debug!(
                "자동 정리 완료: 삭제 {}건, 건너뜀 {}건, 완료={}",
                report.deleted, report.skipped, report.completed
            );
        }

        info!("자동 정리 종료");
    }))
}
