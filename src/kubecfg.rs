use std::process::Command;

use anyhow::{bail, Context};
use tracing::info;

use neotk_schema::accounts::ClusterConfig;

/// The external command that writes the kubeconfig entry for `cluster`.
pub fn kubecfg_command(cluster: &ClusterConfig) -> (&'static str, Vec<String>) {
    match cluster {
        ClusterConfig::Eks(c) => (
            "aws",
            vec![
                "eks".to_string(),
                "update-kubeconfig".to_string(),
                "--name".to_string(),
                c.cluster.clone(),
                "--alias".to_string(),
                c.alias.clone(),
            ],
        ),
        ClusterConfig::Kops(c) => (
            "kops",
            vec![
                "export".to_string(),
                "kubecfg".to_string(),
                "--name".to_string(),
                c.cluster.clone(),
                "--state".to_string(),
                format!("s3://{}", c.bucket),
            ],
        ),
    }
}

pub fn fetch_kubecfg(cluster: &ClusterConfig) -> anyhow::Result<()> {
    let (program, args) = kubecfg_command(cluster);
    info!("running {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(&args)
        .status()
        .with_context(|| format!("failed to run {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}
