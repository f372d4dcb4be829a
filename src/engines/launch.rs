// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::settings::{BrowserRuntime, BrowserSettings};

/// 覆盖 Chromium 可执行文件路径的环境变量
pub const CHROMIUM_PATH_ENV: &str = "LEADSCOUT_CHROMIUM_PATH";

// Variables set by common serverless platforms.
const CONSTRAINED_RUNTIME_ENVS: [&str; 3] =
    ["AWS_LAMBDA_FUNCTION_NAME", "LAMBDA_TASK_ROOT", "VERCEL"];

const BROWSER_BINARIES: [&str; 4] = [
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

const LOCAL_ARGS: [&str; 2] = ["--no-sandbox", "--disable-setuid-sandbox"];

const CONSTRAINED_ARGS: [&str; 9] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--single-process",
    "--no-zygote",
    "--hide-scrollbars",
    "--mute-audio",
    "--disable-extensions",
];

/// 浏览器启动配置
///
/// 只在启动时探测一次，调用点不关心运行环境的差异
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchProfile {
    /// 本地系统 Chromium，未指定路径时交给 chromiumoxide 查找
    Local {
        executable: Option<PathBuf>,
        args: Vec<String>,
    },
    /// 受限运行时，必须使用随包分发的浏览器
    Constrained { executable: PathBuf, args: Vec<String> },
}

impl LaunchProfile {
    pub fn local(executable: Option<PathBuf>) -> Self {
        LaunchProfile::Local {
            executable,
            args: LOCAL_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn constrained(executable: PathBuf) -> Self {
        LaunchProfile::Constrained {
            executable,
            args: CONSTRAINED_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LaunchProfile::Local { .. } => "local",
            LaunchProfile::Constrained { .. } => "constrained",
        }
    }

    pub fn executable(&self) -> Option<&Path> {
        match self {
            LaunchProfile::Local { executable, .. } => executable.as_deref(),
            LaunchProfile::Constrained { executable, .. } => Some(executable.as_path()),
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            LaunchProfile::Local { args, .. } | LaunchProfile::Constrained { args, .. } => args,
        }
    }

    /// 根据配置和环境探测启动配置
    pub fn resolve(settings: &BrowserSettings) -> Self {
        let profile = Self::resolve_with(settings, |key| std::env::var(key).ok(), find_browser_binary);
        info!(
            profile = profile.name(),
            executable = ?profile.executable(),
            "Browser launch profile resolved"
        );
        profile
    }

    /// 探测逻辑本体，环境变量和二进制查找由参数注入
    pub fn resolve_with<E, F>(settings: &BrowserSettings, env: E, find_binary: F) -> Self
    where
        E: Fn(&str) -> Option<String>,
        F: Fn() -> Option<PathBuf>,
    {
        let explicit = settings
            .executable_path
            .clone()
            .or_else(|| env(CHROMIUM_PATH_ENV))
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let constrained_env = CONSTRAINED_RUNTIME_ENVS
            .iter()
            .any(|key| env(key).is_some_and(|v| !v.is_empty()));

        let wants_constrained = match settings.runtime {
            BrowserRuntime::Local => false,
            BrowserRuntime::Constrained => true,
            BrowserRuntime::Auto => constrained_env,
        };

        if wants_constrained {
            match explicit.clone().or_else(&find_binary) {
                Some(executable) => return Self::constrained(executable),
                None => warn!(
                    "Constrained runtime requested but no Chromium binary found, falling back to local profile"
                ),
            }
        }

        Self::local(explicit)
    }
}

/// 在 PATH 中查找 Chromium
pub fn find_browser_binary() -> Option<PathBuf> {
    BROWSER_BINARIES
        .iter()
        .find_map(|name| which::which(name).ok())
}
