// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// 请求历史保留时长
const HISTORY_RETENTION: Duration = Duration::from_secs(3600);
/// 退避检查窗口
const BACKOFF_WINDOW: Duration = Duration::from_secs(300);
/// 退避窗口内允许的最大请求数
const BACKOFF_THRESHOLD: usize = 50;

/// 单个目标站点的限流状态
#[derive(Debug, Default)]
struct DestinationState {
    /// 最近一次请求时间
    last_request: Option<Instant>,
    /// 请求历史，按时间顺序排列
    history: VecDeque<Instant>,
}

/// 按目标站点限速的速率限制器
///
/// 每个目标站点的状态相互独立，由各自的互斥锁保护。
/// 同一站点的并发等待者会串行执行"检查-等待-记录"临界区，
/// 避免两个任务同时判断为无需等待。
#[derive(Debug)]
pub struct RateLimiter {
    /// 默认请求间隔
    default_delay: Duration,
    /// 每个站点的状态
    destinations: DashMap<String, Arc<Mutex<DestinationState>>>,
}

impl RateLimiter {
    /// 创建新的速率限制器
    ///
    /// # 参数
    ///
    /// * `default_delay` - 同一站点两次请求之间的默认间隔
    pub fn new(default_delay: Duration) -> Self {
        Self {
            default_delay,
            destinations: DashMap::new(),
        }
    }

    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    /// 获取或创建站点状态
    fn state(&self, destination: &str) -> Arc<Mutex<DestinationState>> {
        self.destinations
            .entry(destination.to_string())
            .or_default()
            .clone()
    }

    /// 在必要时等待，以满足站点的请求间隔
    ///
    /// 对某站点的第一次请求不会等待。等待结束后记录本次请求时间。
    ///
    /// # 参数
    ///
    /// * `destination` - 目标站点（主机名）
    /// * `delay` - 覆盖默认间隔
    pub async fn wait(&self, destination: &str, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.default_delay);
        let state = self.state(destination);
        let mut state = state.lock().await;

        if let Some(last) = state.last_request {
            let elapsed = last.elapsed();
            if elapsed < delay {
                let remaining = delay - elapsed;
                debug!(
                    destination,
                    wait_ms = remaining.as_millis() as u64,
                    "Rate limiting request"
                );
                sleep(remaining).await;
            }
        }

        state.last_request = Some(Instant::now());
    }

    /// 记录一次请求，并清理超过一小时的历史
    pub async fn record_request(&self, destination: &str) {
        let state = self.state(destination);
        let mut state = state.lock().await;
        let now = Instant::now();
        state.history.push_back(now);

        while let Some(front) = state.history.front() {
            if now.duration_since(*front) > HISTORY_RETENTION {
                state.history.pop_front();
            } else {
                break;
            }
        }
    }

    /// 统计时间窗口内的请求数
    ///
    /// 从最新的记录开始向前扫描，遇到第一个窗口外的记录即停止，
    /// 依赖历史记录按时间顺序排列。
    pub async fn request_count(&self, destination: &str, window: Duration) -> usize {
        let state = self.state(destination);
        let state = state.lock().await;
        let now = Instant::now();

        state
            .history
            .iter()
            .rev()
            .take_while(|t| now.duration_since(**t) <= window)
            .count()
    }

    /// 一小时窗口内的请求数
    pub async fn hourly_request_count(&self, destination: &str) -> usize {
        self.request_count(destination, HISTORY_RETENTION).await
    }

    /// 最近5分钟内请求数超过50时需要退避
    pub async fn should_backoff(&self, destination: &str) -> bool {
        self.request_count(destination, BACKOFF_WINDOW).await > BACKOFF_THRESHOLD
    }
}
