//! 通知指标收集模块
//!
//! 基于投递结果与广播报告收集通知系统的运行指标。

use contracts::{BroadcastReport, DeliveryKind};
use metrics::{counter, gauge, histogram};

/// 记录一次广播
///
/// 由 `Dispatcher::broadcast` 在分发完成后调用。
pub fn record_broadcast(report: &BroadcastReport) {
    counter!("notifier_broadcasts_total").increment(1);
    counter!("notifier_receive_attempts_total").increment(report.attempted as u64);
    histogram!("notifier_broadcast_fanout").record(report.attempted as f64);

    if !report.failures.is_empty() {
        counter!("notifier_broadcasts_with_failures_total").increment(1);
    }
}

/// 记录一次投递 (实时或离线补发)
pub fn record_delivery(subscriber: &str, kind: DeliveryKind) {
    counter!(
        "notifier_deliveries_total",
        "subscriber" => subscriber.to_string(),
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// 记录离线消息入队
pub fn record_message_stored(subscriber: &str) {
    counter!(
        "notifier_messages_stored_total",
        "subscriber" => subscriber.to_string()
    )
    .increment(1);
}

/// 记录队列溢出丢弃
pub fn record_pending_dropped(subscriber: &str) {
    counter!(
        "notifier_pending_dropped_total",
        "subscriber" => subscriber.to_string()
    )
    .increment(1);
}

/// 记录投递失败
pub fn record_delivery_failure(subscriber: &str) {
    counter!(
        "notifier_delivery_failures_total",
        "subscriber" => subscriber.to_string()
    )
    .increment(1);
}

/// 记录在线状态
pub fn record_status_change(subscriber: &str, online: bool) {
    gauge!(
        "notifier_subscriber_online",
        "subscriber" => subscriber.to_string()
    )
    .set(if online { 1.0 } else { 0.0 });
}

/// 记录离线队列深度
pub fn record_pending_depth(subscriber: &str, depth: usize) {
    gauge!(
        "notifier_pending_depth",
        "subscriber" => subscriber.to_string()
    )
    .set(depth as f64);
}

/// 会话指标聚合器
///
/// 在内存中聚合广播与投递统计，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct NotificationAggregator {
    /// 广播次数
    pub total_broadcasts: u64,

    /// receive 调用次数
    pub total_attempts: u64,

    /// receive 失败次数
    pub total_failures: u64,

    /// 实时投递数
    pub real_time_deliveries: u64,

    /// 离线补发数
    pub storage_deliveries: u64,

    /// 广播时已注册订阅者数量的范围 (无广播时为 None)
    pub fanout: Option<FanoutRange>,

    /// 各订阅者失败次数
    pub failure_counts: std::collections::HashMap<String, u64>,
}

impl NotificationAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 累计一次广播报告
    pub fn update(&mut self, report: &BroadcastReport) {
        self.total_broadcasts += 1;
        self.total_attempts += report.attempted as u64;
        self.total_failures += report.failures.len() as u64;
        self.fanout = Some(FanoutRange::include(self.fanout, report.attempted));

        for subscriber in &report.failures {
            *self
                .failure_counts
                .entry(subscriber.to_string())
                .or_insert(0) += 1;
        }
    }

    /// 累计一次投递
    pub fn record_delivery(&mut self, kind: DeliveryKind) {
        match kind {
            DeliveryKind::RealTime => self.real_time_deliveries += 1,
            DeliveryKind::FromStorage => self.storage_deliveries += 1,
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> AggregatorSummary {
        AggregatorSummary {
            total_broadcasts: self.total_broadcasts,
            total_attempts: self.total_attempts,
            total_failures: self.total_failures,
            real_time_deliveries: self.real_time_deliveries,
            storage_deliveries: self.storage_deliveries,
            failure_rate: if self.total_attempts > 0 {
                self.total_failures as f64 / self.total_attempts as f64 * 100.0
            } else {
                0.0
            },
            fanout: self.fanout,
            failure_counts: self.failure_counts.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct AggregatorSummary {
    pub total_broadcasts: u64,
    pub total_attempts: u64,
    pub total_failures: u64,
    pub real_time_deliveries: u64,
    pub storage_deliveries: u64,
    pub failure_rate: f64,
    pub fanout: Option<FanoutRange>,
    pub failure_counts: std::collections::HashMap<String, u64>,
}

impl std::fmt::Display for AggregatorSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Notification Summary ===")?;
        writeln!(f, "Broadcasts: {}", self.total_broadcasts)?;
        writeln!(
            f,
            "Receive attempts: {} (failures: {}, {:.2}%)",
            self.total_attempts, self.total_failures, self.failure_rate
        )?;
        writeln!(f, "Real-time deliveries: {}", self.real_time_deliveries)?;
        writeln!(f, "Delivered from storage: {}", self.storage_deliveries)?;
        match self.fanout {
            Some(range) => writeln!(f, "Subscribers per broadcast: {}", range)?,
            None => writeln!(f, "Subscribers per broadcast: N/A")?,
        }

        if !self.failure_counts.is_empty() {
            writeln!(f, "Failures per subscriber:")?;
            for (subscriber, count) in &self.failure_counts {
                writeln!(f, "  {}: {}", subscriber, count)?;
            }
        }

        Ok(())
    }
}

/// 每次广播的订阅者数量范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutRange {
    pub min: usize,
    pub max: usize,
}

impl FanoutRange {
    /// 合并一次广播的订阅者数量
    fn include(range: Option<Self>, fanout: usize) -> Self {
        match range {
            Some(range) => Self {
                min: range.min.min(fanout),
                max: range.max.max(fanout),
            },
            None => Self {
                min: fanout,
                max: fanout,
            },
        }
    }
}

impl std::fmt::Display for FanoutRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}
