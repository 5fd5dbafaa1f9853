//! 视图级请求作用域
//!
//! 每个视图持有一个 `RequestScope`，经由它发出的请求在视图卸载时被中止，
//! 迟到的结果不会再写回任何状态。没有超时。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{AbortHandle, Abortable};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 在途请求的中止句柄，请求结束后自行移除
#[derive(Default)]
struct InFlight {
    next_key: u64,
    handles: HashMap<u64, AbortHandle>,
}

#[derive(Default)]
pub struct RequestScope {
    in_flight: Rc<RefCell<InFlight>>,
    cancelled: Cell<bool>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 包装一个 future，使其可被本作用域中止
    ///
    /// 返回的 future 不借用作用域，可以直接交给 `spawn_local`。
    /// 作用域已取消时立即得到 `Aborted`。
    pub fn wrap<F: Future>(&self, fut: F) -> impl Future<Output = AppResult<F::Output>> + use<F> {
        let (handle, registration) = AbortHandle::new_pair();
        let key = if self.cancelled.get() {
            handle.abort();
            None
        } else {
            let mut in_flight = self.in_flight.borrow_mut();
            let key = in_flight.next_key;
            in_flight.next_key += 1;
            in_flight.handles.insert(key, handle);
            Some(key)
        };

        let in_flight = Rc::downgrade(&self.in_flight);
        Abortable::new(fut, registration).map(move |r| {
            if let (Some(key), Some(in_flight)) = (key, in_flight.upgrade()) {
                in_flight.borrow_mut().handles.remove(&key);
            }
            r.map_err(AppError::from)
        })
    }

    /// 中止所有在途请求，之后包装的请求也会立即中止
    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        let handles: Vec<_> = self
            .in_flight
            .borrow_mut()
            .handles
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        debug!(in_flight = handles.len(), "request scope cancelled");
        for handle in handles {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// 尚未结束的请求数
    pub fn in_flight(&self) -> usize {
        self.in_flight.borrow().handles.len()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completed_request_passes_through() {
        let scope = RequestScope::new();
        let out = scope.wrap(async { 42 }).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_result() {
        let scope = RequestScope::new();
        let slow = scope.wrap(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "late"
        });
        scope.cancel();

        let err = slow.await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Aborted));
    }

    #[tokio::test]
    async fn test_drop_aborts_and_late_wraps_fail_fast() {
        let scope = RequestScope::new();
        let pending = scope.wrap(std::future::pending::<()>());
        drop(scope);
        assert!(pending.await.is_err());

        let scope = RequestScope::new();
        scope.cancel();
        assert!(scope.is_cancelled());
        assert!(scope.wrap(async { 1 }).await.is_err());
    }

    #[tokio::test]
    async fn test_settled_requests_release_their_handles() {
        let scope = RequestScope::new();
        for i in 0..5 {
            assert_eq!(scope.wrap(async move { i }).await.unwrap(), i);
        }
        assert_eq!(scope.in_flight(), 0);

        let pending = scope.wrap(std::future::pending::<()>());
        assert_eq!(scope.in_flight(), 1);
        scope.cancel();
        assert_eq!(scope.in_flight(), 0);
        assert!(pending.await.is_err());
    }
}
