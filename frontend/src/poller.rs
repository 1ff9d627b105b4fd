//! 仪表盘轮询器
//!
//! 两状态机：Idle <-> Polling。进入护工仪表盘时立即刷新一次，
//! 之后每 10 秒调度一次；离开页面、登出或重复进入都会先同步取消
//! 现有调度，保证任一时刻每个标签页至多一个活动定时器。
//!
//! 取消只针对调度本身：已经在途的单次请求会跑完（可能对一个已不
//! 可见的页面做一次无害的重绘），由页面侧的守卫去兜底。

use std::cell::RefCell;

/// 仪表盘刷新间隔（毫秒）
pub const DASHBOARD_REFRESH_MILLIS: u32 = 10_000;

// =========================================================
// 核心抽象层 (Ticker Abstraction)
// =========================================================

/// 一个活动中的周期调度句柄
pub trait TickerHandle {
    /// 同步停止调度；之后不会再有任何回调触发
    fn stop(self);
}

/// 周期调度的工厂，浏览器实现基于 `setInterval`，测试实现做计数
pub trait TickerFactory {
    type Handle: TickerHandle;

    fn spawn(&self, millis: u32, tick: Box<dyn Fn()>) -> Self::Handle;
}

/// 轮询器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
}

// =========================================================
// 状态机
// =========================================================

pub struct DashboardPoller<F: TickerFactory> {
    factory: F,
    ticker: Option<F::Handle>,
}

impl<F: TickerFactory> DashboardPoller<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            ticker: None,
        }
    }

    pub fn state(&self) -> PollState {
        if self.ticker.is_some() {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    /// Idle -> Polling（已在 Polling 则先回到 Idle 再重新武装）
    ///
    /// 立即执行一次 `tick`，然后按 `millis` 周期调度。
    pub fn rearm(&mut self, millis: u32, tick: Box<dyn Fn()>) {
        self.cancel();
        tick();
        self.ticker = Some(self.factory.spawn(millis, tick));
    }

    /// Polling -> Idle。幂等：Idle 状态下调用无副作用。
    pub fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}

// =========================================================
// 实现层: 浏览器定时器
// =========================================================

/// `gloo_timers` Interval 的句柄包装
pub struct IntervalTicker(gloo_timers::callback::Interval);

impl TickerHandle for IntervalTicker {
    fn stop(self) {
        self.0.cancel();
    }
}

pub struct IntervalFactory;

impl TickerFactory for IntervalFactory {
    type Handle = IntervalTicker;

    fn spawn(&self, millis: u32, tick: Box<dyn Fn()>) -> IntervalTicker {
        IntervalTicker(gloo_timers::callback::Interval::new(millis, move || {
            tick()
        }))
    }
}

// =========================================================
// 标签页级单例
// =========================================================

thread_local! {
    static POLLER: RefCell<DashboardPoller<IntervalFactory>> =
        RefCell::new(DashboardPoller::new(IntervalFactory));
}

/// 武装（或重新武装）仪表盘轮询
pub fn rearm(tick: Box<dyn Fn()>) {
    POLLER.with(|p| p.borrow_mut().rearm(DASHBOARD_REFRESH_MILLIS, tick));
}

/// 取消仪表盘轮询
pub fn cancel() {
    POLLER.with(|p| p.borrow_mut().cancel());
}

/// 当前是否处于轮询状态
pub fn is_polling() -> bool {
    POLLER.with(|p| p.borrow().state() == PollState::Polling)
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 记录存活定时器数量的 Mock 工厂
    #[derive(Clone)]
    struct MockFactory {
        live: Rc<Cell<usize>>,
        spawned: Rc<Cell<usize>>,
    }

    impl MockFactory {
        fn new() -> Self {
            Self {
                live: Rc::new(Cell::new(0)),
                spawned: Rc::new(Cell::new(0)),
            }
        }
    }

    struct MockHandle {
        live: Rc<Cell<usize>>,
    }

    impl TickerHandle for MockHandle {
        fn stop(self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl TickerFactory for MockFactory {
        type Handle = MockHandle;

        fn spawn(&self, _millis: u32, _tick: Box<dyn Fn()>) -> MockHandle {
            self.live.set(self.live.get() + 1);
            self.spawned.set(self.spawned.get() + 1);
            MockHandle {
                live: self.live.clone(),
            }
        }
    }

    #[test]
    fn test_rearm_runs_immediate_tick() {
        let factory = MockFactory::new();
        let mut poller = DashboardPoller::new(factory);

        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        poller.rearm(10_000, Box::new(move || counter.set(counter.get() + 1)));

        // 武装时立即刷新一次，不等第一个周期
        assert_eq!(ticks.get(), 1);
        assert_eq!(poller.state(), PollState::Polling);
    }

    #[test]
    fn test_rearm_twice_keeps_single_live_ticker() {
        let factory = MockFactory::new();
        let live = factory.live.clone();
        let spawned = factory.spawned.clone();
        let mut poller = DashboardPoller::new(factory);

        poller.rearm(10_000, Box::new(|| {}));
        poller.rearm(10_000, Box::new(|| {}));

        // 连续进入仪表盘两次：创建过两个定时器，但存活的恒为一个
        assert_eq!(spawned.get(), 2);
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_cancel_stops_ticker() {
        let factory = MockFactory::new();
        let live = factory.live.clone();
        let mut poller = DashboardPoller::new(factory);

        poller.rearm(10_000, Box::new(|| {}));
        poller.cancel();

        assert_eq!(live.get(), 0);
        assert_eq!(poller.state(), PollState::Idle);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let factory = MockFactory::new();
        let live = factory.live.clone();
        let mut poller = DashboardPoller::new(factory);

        poller.cancel();
        poller.rearm(10_000, Box::new(|| {}));
        poller.cancel();
        poller.cancel();

        assert_eq!(live.get(), 0);
    }
}
