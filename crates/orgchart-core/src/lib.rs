//! Orgchart Core Types and Definitions
//!
//! This crate provides the foundational types shared by the organization
//! chart engine and its front ends:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS colors and the contact-level fill palette ([`color`] module)
//! - **Geometry**: Points, sizes and bounds in chart space ([`geometry`] module)
//! - **Text**: Label measurement with a fallback estimate ([`text`] module)
//! - **Records**: Flat unit and leaf records ([`record`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod record;
pub mod text;
