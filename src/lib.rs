// ==========================================
// LLD 配置生成工具 - 核心库
// ==========================================
// 定位: LLD 规划工作簿 → 按设备的类型化记录 → 模板渲染的设备配置
// 技术栈: calamine + serde + tera
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 工作簿模型与类型化记录
pub mod domain;

// 导入层 - 解析 / 定位 / 派生 / 映射
pub mod importer;

// 引擎层 - 表目录 / 记录收集 / 设备上下文
pub mod engine;

// 渲染层 - 模板与输出
pub mod render;

// 配置层 - settings.yaml / DevConfig.yaml
pub mod config;

// 日志系统
pub mod logging;

// 应用层 - 命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{DeviceRecords, Record, RecordKind, Workbook};
pub use engine::{DeviceConfigCollector, DeviceConfigContext};
pub use importer::{ImportError, ImportResult, RowRejection};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "LLD 配置生成工具";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
