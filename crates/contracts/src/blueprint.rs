//! NotifierBlueprint - Config Loader 输出
//!
//! 描述完整的通知系统配置：订阅者、预定义事件、离线队列策略。

use serde::{Deserialize, Serialize};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的通知系统配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 订阅者列表 (注册顺序即分发顺序)
    #[serde(default)]
    pub subscribers: Vec<SubscriberConfig>,

    /// 预定义事件 (CLI `trigger <name>`)
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

/// 订阅者配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberConfig {
    /// 唯一标识符
    pub id: String,

    /// 订阅者类型
    #[serde(default)]
    pub kind: SubscriberKind,

    /// 初始在线状态
    #[serde(default)]
    pub online: bool,

    /// 离线队列容量 (None = 不限)
    #[serde(default)]
    pub pending_capacity: Option<usize>,

    /// 队列满时的策略
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl SubscriberConfig {
    /// Admin subscriber with an unbounded queue
    pub fn admin(id: impl Into<String>, online: bool) -> Self {
        Self {
            id: id.into(),
            kind: SubscriberKind::Admin,
            online,
            pending_capacity: None,
            overflow: OverflowPolicy::default(),
        }
    }

    /// Queue bound and overflow policy for this subscriber
    pub fn pending_limit(&self) -> PendingLimit {
        PendingLimit {
            capacity: self.pending_capacity,
            overflow: self.overflow,
        }
    }
}

/// 订阅者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberKind {
    /// 管理员：在线实时投递，离线排队
    #[default]
    Admin,
    /// 日志输出 (离线时跳过，不排队)
    Log,
}

/// 离线队列溢出策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// 丢弃最旧的消息
    #[default]
    DropOldest,
    /// 拒绝新消息
    Reject,
}

/// 离线队列上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingLimit {
    pub capacity: Option<usize>,
    pub overflow: OverflowPolicy,
}

impl PendingLimit {
    /// 不限容量
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize, overflow: OverflowPolicy) -> Self {
        Self {
            capacity: Some(capacity),
            overflow,
        }
    }
}

/// 预定义事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// 事件名 (CLI 引用)
    pub name: String,

    /// 事件描述 (广播内容为 "New event: " + description)
    pub description: String,
}

impl NotifierBlueprint {
    /// Built-in wiring: one online admin, one offline admin, two canned events
    pub fn demo() -> Self {
        Self {
            version: ConfigVersion::V1,
            subscribers: vec![
                SubscriberConfig::admin("hamid", true),
                SubscriberConfig::admin("mudassir", false),
            ],
            events: vec![
                EventConfig {
                    name: "feedback".into(),
                    description: "Feedback submitted by User".into(),
                },
                EventConfig {
                    name: "report".into(),
                    description: "Monthly report is ready".into(),
                },
            ],
        }
    }

    /// Look up a predefined event by name
    pub fn event(&self, name: &str) -> Option<&EventConfig> {
        self.events.iter().find(|event| event.name == name)
    }
}
