#![no_std]

//! Depth-sorted first-person renderer for a DMA-fed console GPU.
//!
//! The frame loop builds an ordering table of GP0 packets with the help of a
//! software model of the geometry coprocessor, then hands the table to the DMA
//! engine as a linked list while the other command chain is being built.

pub mod assets;
pub mod config;
pub mod gpu;
pub mod gte;
pub mod input;
pub mod math;
pub mod render;
pub mod scene;
