// ─── Launch Task ───
// Builds the game-client command line from a launch specification.

use std::process::Command;

use super::spec::LaunchSpecification;

const LAUNCHER_BRAND: &str = "CraftShell";
const LAUNCHER_VERSION: &str = "0.1.0";

/// Assemble the JVM invocation for one launch. The command is ready to spawn;
/// the supervisor owns stdio wiring and the resulting child process.
pub fn build_command(spec: &LaunchSpecification) -> Command {
    let mut cmd = Command::new(&spec.java_binary);

    // ── JVM Arguments ──
    cmd.arg(format!("-Xms{}M", spec.memory.min_mb));
    cmd.arg(format!("-Xmx{}M", spec.memory.max_mb));
    cmd.arg(format!("-Dminecraft.launcher.brand={LAUNCHER_BRAND}"));
    cmd.arg(format!("-Dminecraft.launcher.version={LAUNCHER_VERSION}"));

    cmd.arg("-jar").arg(spec.client_jar());

    // ── Game Arguments ──
    cmd.arg("--username").arg(&spec.authorization.username);
    cmd.arg("--uuid").arg(&spec.authorization.uuid);
    cmd.arg("--accessToken").arg(spec.authorization.access_token());
    cmd.arg("--userType").arg(&spec.authorization.user_type);
    cmd.arg("--version").arg(&spec.version.number);
    cmd.arg("--versionType").arg(spec.version.channel.as_str());
    cmd.arg("--gameDir").arg(&spec.install_root);

    cmd.current_dir(&spec.install_root);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::AuthorizationToken;
    use crate::core::launch::spec::LaunchConfig;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn command_carries_memory_version_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let token = AuthorizationToken::new(
            "Steve".into(),
            "uuid-1".into(),
            "legacy".into(),
            "tok-1".into(),
        );
        let spec =
            LaunchSpecification::from_config(&LaunchConfig::default(), dir.path(), token)
                .unwrap();

        let cmd = build_command(&spec);
        let args = args_of(&cmd);

        assert_eq!(cmd.get_program().to_string_lossy(), "java");
        assert!(args.contains(&"-Xms4096M".to_string()));
        assert!(args.contains(&"-Xmx6144M".to_string()));
        assert!(args.contains(&"--username".to_string()));
        assert!(args.contains(&"Steve".to_string()));
        assert!(args.contains(&"--accessToken".to_string()));
        assert!(args.contains(&"tok-1".to_string()));
        assert!(args.contains(&"--version".to_string()));
        assert!(args.contains(&"1.17.1".to_string()));
        assert!(args.contains(&"release".to_string()));
        assert_eq!(cmd.get_current_dir(), Some(spec.install_root.as_path()));
    }

    #[test]
    fn jar_argument_points_into_the_versioned_layout() {
        let dir = tempfile::tempdir().unwrap();
        let token =
            AuthorizationToken::new("Alex".into(), "uuid-2".into(), "legacy".into(), "t".into());
        let spec =
            LaunchSpecification::from_config(&LaunchConfig::default(), dir.path(), token)
                .unwrap();

        let args = args_of(&build_command(&spec));
        let jar_position = args.iter().position(|arg| arg == "-jar").unwrap();
        assert!(args[jar_position + 1].ends_with("1.17.1.jar"));
    }
}
