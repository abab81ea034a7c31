// ==========================================
// LLD 配置生成工具 - 渲染层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("模板目录加载失败 ({dir}): {source}")]
    TemplateLoad {
        dir: String,
        #[source]
        source: tera::Error,
    },

    #[error("模板不存在: {template} (设备: {ci_name})")]
    TemplateNotFound { template: String, ci_name: String },

    #[error("模板渲染失败 ({template}, 设备: {ci_name}): {message}")]
    Render {
        template: String,
        ci_name: String,
        message: String,
    },

    #[error("型号匹配规则非法: {0}")]
    Pattern(#[from] regex::Error),

    #[error("配置文件保存失败 ({path}): {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;
