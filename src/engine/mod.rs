// ==========================================
// LLD 配置生成工具 - 引擎层
// ==========================================
// 职责: 表目录（区域 / 表头 / 映射）→ 按种类构建并缓存记录集合 → 单设备上下文
// 红线: 每种记录在一次运行中只构建一次，返回的集合只读共享
// ==========================================

pub mod catalog;
pub mod collector;
pub mod device_conf;

// 重导出核心引擎
pub use catalog::TableSpec;
pub use collector::{assign_virtual_macs, DeviceConfigCollector, SnmpTarget};
pub use device_conf::DeviceConfigContext;
