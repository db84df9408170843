// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdpError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Example set error: {0}")]
    Example(String),

    #[error("Weights file error: {0}")]
    WeightsFile(String),

    #[error("Unit graph error: {0}")]
    Graph(String),

    #[error("Scoreboard protocol mismatch: {0}")]
    Protocol(String),

    #[error("Placement service error: {0}")]
    Placement(String),

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wire format error: {0}")]
    Wire(#[from] pdpflow_fixed::WireError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PdpError>;
