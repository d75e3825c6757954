//! # dw-service
//!
//! Application layer: the reaction engagement controller, community
//! analytics, notices, startup wiring, and the view models and DTOs built
//! on them.

pub mod bootstrap;
pub mod dto;
pub mod presentation;
pub mod services;

pub use presentation::{ReactionBar, ReactionBarEvent, ReactionBarView};
pub use services::{
    AnalyticsService, AnalyticsSource, BroadcastNotifier, IntentOutcome, Notice, NoticeLevel,
    Notifier, ReactionController, ReactionSnapshot, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, Signal, TracingNotifier,
};
