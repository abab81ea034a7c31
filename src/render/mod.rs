// ==========================================
// LLD 配置生成工具 - 渲染层
// ==========================================
// 职责: 设备上下文 → 模板 → <ci_name>.txt
// 工具: tera（Jinja2 兼容语法）+ regex（型号识别）
// ==========================================

pub mod error;
pub mod filters;
pub mod renderer;

pub use error::{RenderError, RenderResult};
pub use renderer::{ConfigRenderer, ModelResolver, DEFAULT_MODEL, S57XX_MODEL};
