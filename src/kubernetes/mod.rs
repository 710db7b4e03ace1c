// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, CRD generation and discovery.

pub mod client;
pub mod crd;

pub use client::{create_client, create_client_from_kubeconfig};
pub use crd::{all_crds, apply_crds, crds_yaml, extract_schema, wait_for_crds};
