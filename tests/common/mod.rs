use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

pub const CONNECTION_VARS: [&str; 4] = [
    "API_KEY",
    "API_VERSION",
    "AZURE_ENDPOINT",
    "AZURE_MODEL_DEPLOYMENT",
];

#[allow(dead_code)]
pub const SAMPLE_INPUT: &str = r#"{
  "conversation": "Doctor: Your blood sugar is high. Patient: Hello doctor, what should I eat?",
  "language": "English",
  "medicalliteracylevel": "basic",
  "agegroup": "60-70",
  "length": "detailed"
}"#;

#[allow(dead_code)]
pub fn run_patient_guide(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    work: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            work: tempfile::tempdir().expect("create temporary working dir"),
        }
    }

    fn command<K, V>(&self, args: &[&str], vars: &[(K, V)]) -> Command
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_patient-guide"));
        cmd.args(args)
            .current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env_remove("RUST_LOG");
        for name in CONNECTION_VARS {
            cmd.env_remove(name);
        }
        for (name, value) in vars {
            cmd.env(name, value);
        }
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env::<&str, &str>(args, &[])
    }

    pub fn run_with_env<K, V>(&self, args: &[&str], vars: &[(K, V)]) -> Output
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.command(args, vars)
            .output()
            .expect("failed to execute patient-guide binary")
    }

    #[allow(dead_code)]
    pub fn run_with_stdin<K, V>(&self, args: &[&str], vars: &[(K, V)], stdin: &str) -> Output
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        use std::io::Write;

        let mut child = self
            .command(args, vars)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn patient-guide binary");
        child
            .stdin
            .take()
            .expect("child stdin")
            .write_all(stdin.as_bytes())
            .expect("write child stdin");
        child
            .wait_with_output()
            .expect("failed to wait for patient-guide binary")
    }

    #[allow(dead_code)]
    pub fn work_dir(&self) -> &Path {
        self.work.path()
    }

    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work.path().join(name);
        std::fs::write(&path, contents).expect("write test file");
        path
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}

/// Connection variables pointing at a mock server.
#[allow(dead_code)]
pub fn connection_vars(endpoint: &str) -> Vec<(&'static str, String)> {
    vec![
        ("API_KEY", "test-key".to_string()),
        ("API_VERSION", "2024-02-01".to_string()),
        ("AZURE_ENDPOINT", endpoint.to_string()),
        ("AZURE_MODEL_DEPLOYMENT", "test-deployment".to_string()),
    ]
}
