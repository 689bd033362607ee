//! Hazardous materials: functionality which can be misused and needs to be used with care.
//!
//! <div class="warning">
//! Functionality provided in this module is low-level and intended for constructing higher-level
//! primitives as opposed to being used directly.
//! </div>
//!
//! [`FieldElement`] uses the byte-reversed representation described on its docs, and its `*`
//! operator includes a division by `x^128`. Neither matches GHASH's block encoding directly.

pub use crate::field_element::{FieldElement, Product, reduce, schoolbook};
