// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Print the StarterKit CustomResourceDefinition as YAML

use kube::CustomResourceExt;
use starter_kit_operator::types::StarterKit;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&StarterKit::crd())?);
    Ok(())
}
