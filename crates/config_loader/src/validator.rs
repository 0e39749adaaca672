//! 配置校验模块
//!
//! 校验规则：
//! - subscriber id 非空且唯一
//! - event name 非空且唯一，description 非空
//! - pending_capacity > 0，且仅用于 admin 订阅者

use std::collections::HashSet;

use contracts::{ContractError, NotifierBlueprint, SubscriberKind};

/// 校验 NotifierBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    validate_subscriber_ids(blueprint)?;
    validate_pending_limits(blueprint)?;
    validate_events(blueprint)?;
    Ok(())
}

/// 校验 subscriber id 非空与唯一性
fn validate_subscriber_ids(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, subscriber) in blueprint.subscribers.iter().enumerate() {
        if subscriber.id.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("subscribers[{}].id", idx),
                "subscriber id cannot be empty",
            ));
        }
        if !seen.insert(subscriber.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("subscribers[id={}]", subscriber.id),
                "duplicate subscriber id",
            ));
        }
    }
    Ok(())
}

/// 校验离线队列容量
fn validate_pending_limits(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    for subscriber in &blueprint.subscribers {
        let Some(capacity) = subscriber.pending_capacity else {
            continue;
        };

        if subscriber.kind != SubscriberKind::Admin {
            return Err(ContractError::config_validation(
                format!("subscribers[{}].pending_capacity", subscriber.id),
                "pending_capacity is only supported for admin subscribers",
            ));
        }
        if capacity == 0 {
            return Err(ContractError::config_validation(
                format!("subscribers[{}].pending_capacity", subscriber.id),
                "pending_capacity must be > 0",
            ));
        }
    }
    Ok(())
}

/// 校验预定义事件
fn validate_events(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, event) in blueprint.events.iter().enumerate() {
        if event.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("events[{}].name", idx),
                "event name cannot be empty",
            ));
        }
        if event.name.contains(char::is_whitespace) {
            return Err(ContractError::config_validation(
                format!("events[{}].name", idx),
                format!("event name '{}' cannot contain whitespace", event.name),
            ));
        }
        if event.description.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("events[{}].description", event.name),
                "event description cannot be empty",
            ));
        }
        if !seen.insert(event.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("events[name={}]", event.name),
                "duplicate event name",
            ));
        }
    }
    Ok(())
}
