use std::env;
use std::time::Duration;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Frame rates above this would round the frame interval down toward zero.
pub const MAX_FPS: f32 = 240.0;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub max_upload_bytes: u64,
    pub generation_timeout: Duration,
    pub scroll_delay: Duration,
    pub toast_duration: Duration,
    pub page_url: String,
}

#[derive(Debug, Clone)]
pub struct SnowfallConfig {
    pub flake_count: usize,
    pub fps: f32,
    /// RGBA fill used for every flake.
    pub fill: [f32; 4],
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub workflow: WorkflowConfig,
    pub snowfall: SnowfallConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(90),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok();
        let model = env::var("GEMINI_MODEL").unwrap_or(defaults.model);
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url);

        GeminiConfig {
            api_key,
            model,
            base_url,
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            generation_timeout: Duration::from_secs(60),
            scroll_delay: Duration::from_millis(100),
            toast_duration: Duration::from_secs(3),
            page_url: "http://localhost:3000/".to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_upload_bytes);
        let generation_timeout = env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.generation_timeout);
        let page_url = env::var("PAGE_URL").unwrap_or(defaults.page_url);

        WorkflowConfig {
            max_upload_bytes,
            generation_timeout,
            page_url,
            ..defaults
        }
    }

    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = url.into();
        self
    }
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        SnowfallConfig {
            flake_count: 50,
            fps: 60.0,
            fill: [1.0, 1.0, 1.0, 0.8],
        }
    }
}

impl SnowfallConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let flake_count = env::var("SNOWFLAKE_COUNT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.flake_count);
        let fps = env::var("SNOWFALL_FPS")
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|fps| *fps > 0.0)
            .map(|fps| fps.clamp(1.0, MAX_FPS))
            .unwrap_or(defaults.fps);

        SnowfallConfig {
            flake_count,
            fps,
            ..defaults
        }
    }

    pub fn with_flake_count(mut self, count: usize) -> Self {
        self.flake_count = count;
        self
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps.clamp(1.0, MAX_FPS);
        self
    }

    pub fn frame_interval(&self) -> Duration {
        let fps = if self.fps.is_nan() {
            1.0
        } else {
            self.fps.clamp(1.0, MAX_FPS)
        };
        Duration::from_secs_f32(1.0 / fps)
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        AppConfig {
            gemini: GeminiConfig::from_env(),
            workflow: WorkflowConfig::from_env(),
            snowfall: SnowfallConfig::from_env(),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_workflow(mut self, config: WorkflowConfig) -> Self {
        self.workflow = config;
        self
    }

    pub fn with_snowfall(mut self, config: SnowfallConfig) -> Self {
        self.snowfall = config;
        self
    }
}
