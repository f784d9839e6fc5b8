use shared::models::Coordinates;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Longest accepted preparation delay or tick period
pub const MAX_TIMER_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Most delivery ticks a simulation may take
pub const MAX_DELIVERY_TICKS: u32 = 10_000;

/// Restaurant location used as the delivery origin
pub const DEFAULT_ORIGIN: Coordinates = Coordinates::new(6.927079, 79.861244);

/// 运行配置 - 核心库的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | ./data | redb 数据目录 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志文件目录（按天滚动） |
/// | PREP_DELAY_MS | 10000 | 备餐时长(毫秒) |
/// | TICK_INTERVAL_MS | 200 | 配送位置刷新间隔(毫秒) |
/// | DELIVERY_TICKS | 40 | 配送总步数 |
/// | RESTAURANT_LAT | 6.927079 | 餐厅纬度 |
/// | RESTAURANT_LNG | 79.861244 | 餐厅经度 |
///
/// # 示例
///
/// ```ignore
/// PREP_DELAY_MS=2000 DELIVERY_TICKS=10 cargo test
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// redb 数据目录
    pub data_dir: PathBuf,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志文件目录，None 时输出到 stdout
    pub log_dir: Option<String>,
    /// 订单模拟参数
    pub simulation: SimulationConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let defaults = SimulationConfig::default();
        Self {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            simulation: SimulationConfig {
                preparation_delay: Duration::from_millis(env_or(
                    "PREP_DELAY_MS",
                    defaults.preparation_delay.as_millis() as u64,
                )),
                tick_interval: Duration::from_millis(env_or(
                    "TICK_INTERVAL_MS",
                    defaults.tick_interval.as_millis() as u64,
                )),
                max_ticks: env_or("DELIVERY_TICKS", defaults.max_ticks),
                origin: Coordinates::new(
                    env_or("RESTAURANT_LAT", defaults.origin.lat),
                    env_or("RESTAURANT_LNG", defaults.origin.lng),
                ),
            }
            .normalized(),
        }
    }

    /// Path of the profile/history database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("profiles.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Order status simulation parameters
///
/// The reference timings (10 s preparation, 40 ticks of 200 ms) are tuned for
/// presentation and carry no business rule, so every value is configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Delay between placing the order and the start of delivery
    pub preparation_delay: Duration,
    /// Period of one delivery tick
    pub tick_interval: Duration,
    /// Number of ticks from origin to destination
    pub max_ticks: u32,
    /// Courier start point (the restaurant)
    pub origin: Coordinates,
}

impl SimulationConfig {
    /// Clamp values the engine cannot run with: zero ticks or period,
    /// and periods or tick counts whose deadlines would overflow.
    pub fn normalized(mut self) -> Self {
        self.max_ticks = self.max_ticks.clamp(1, MAX_DELIVERY_TICKS);
        self.tick_interval = self
            .tick_interval
            .clamp(Duration::from_millis(1), MAX_TIMER_PERIOD);
        self.preparation_delay = self.preparation_delay.min(MAX_TIMER_PERIOD);
        if !self.origin.is_finite() {
            self.origin = DEFAULT_ORIGIN;
        }
        self
    }

    /// Total simulated time from placement to completion
    pub fn total_duration(&self) -> Duration {
        self.preparation_delay + self.tick_interval * self.max_ticks
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            preparation_delay: Duration::from_secs(10),
            tick_interval: Duration::from_millis(200),
            max_ticks: 40,
            origin: DEFAULT_ORIGIN,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_simulation_matches_reference_timings() {
        let sim = SimulationConfig::default();
        assert_eq!(sim.preparation_delay, Duration::from_secs(10));
        assert_eq!(sim.tick_interval, Duration::from_millis(200));
        assert_eq!(sim.max_ticks, 40);
        assert_eq!(sim.total_duration(), Duration::from_secs(18));
    }

    #[test]
    fn test_normalized_clamps_degenerate_values() {
        let sim = SimulationConfig {
            preparation_delay: Duration::ZERO,
            tick_interval: Duration::ZERO,
            max_ticks: 0,
            origin: Coordinates::new(f64::NAN, 0.0),
        }
        .normalized();
        assert_eq!(sim.max_ticks, 1);
        assert_eq!(sim.tick_interval, Duration::from_millis(1));
        assert_eq!(sim.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_normalized_caps_huge_values() {
        let sim = SimulationConfig {
            preparation_delay: Duration::from_millis(u64::MAX),
            tick_interval: Duration::from_millis(u64::MAX),
            max_ticks: u32::MAX,
            origin: DEFAULT_ORIGIN,
        }
        .normalized();
        assert_eq!(sim.preparation_delay, MAX_TIMER_PERIOD);
        assert_eq!(sim.tick_interval, MAX_TIMER_PERIOD);
        assert_eq!(sim.max_ticks, MAX_DELIVERY_TICKS);
        // Deadlines stay representable
        assert!(tokio::time::Instant::now().checked_add(sim.total_duration()).is_some());
    }

    #[test]
    fn test_env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("ORDER_CORE_TEST_SURELY_UNSET", 42u32), 42);
        // Only this test touches this variable.
        unsafe { std::env::set_var("ORDER_CORE_TEST_GARBAGE", "not-a-number") };
        assert_eq!(env_or("ORDER_CORE_TEST_GARBAGE", 7u64), 7);
        unsafe { std::env::set_var("ORDER_CORE_TEST_GARBAGE", " 15 ") };
        assert_eq!(env_or("ORDER_CORE_TEST_GARBAGE", 7u64), 15);
    }

    #[test]
    fn test_database_path() {
        let mut config = Config::from_env();
        config.data_dir = PathBuf::from("/tmp/orders");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/orders/profiles.redb"));
    }
}
