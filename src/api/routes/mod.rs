//! API Routes
//!
//! Route handlers organized by functionality.

pub mod campaigns;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod live;
pub mod notifications;
pub mod theme;
