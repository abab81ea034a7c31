// ==========================================
// LLD 配置生成工具 - 设备配置渲染器
// ==========================================
// 职责: 型号识别 → 模板选择 → 渲染 → 保存 <ci_name>.txt
// 红线: 模板引擎只消费 DeviceConfigContext，不回读工作簿
// ==========================================

use crate::config::app_config::DEFAULT_TEMPLATE;
use crate::engine::device_conf::DeviceConfigContext;
use crate::render::error::{RenderError, RenderResult};
use crate::render::filters::register_filters;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, info, warn};

/// 设备名中的型号片段，如 `-CE6881-` / `-S5735(G)-`
const MODEL_PATTERN: &str = r"-([A-Za-z]{1,2}\d{4,5}(?:\(G\))?)-";

/// 设备名中没有型号片段时使用的型号
pub const DEFAULT_MODEL: &str = "default";

/// 需要特殊处理的接入交换机型号族
pub const S57XX_MODEL: &str = "S57XX";
const S57XX_MANAGE_INT: &str = "MEth0/0/1";

// ==========================================
// ModelResolver - 设备名 → 型号族
// ==========================================
#[derive(Debug, Clone)]
pub struct ModelResolver {
    pattern: Regex,
    mapping: Vec<(String, String)>,
}

impl ModelResolver {
    /// # 参数
    /// - mapping: (型号前缀, 型号族)，按顺序匹配
    pub fn new(mapping: Vec<(String, String)>) -> RenderResult<Self> {
        Ok(Self {
            pattern: Regex::new(MODEL_PATTERN)?,
            mapping,
        })
    }

    /// 从设备名解析型号族
    ///
    /// # 规则
    /// - 提取两个 `-` 之间的型号片段并去掉 `(G)`
    /// - 取第一个前缀匹配的映射值，无匹配时使用型号本身
    /// - 设备名中没有型号片段时返回 `default`
    pub fn resolve(&self, ci_name: &str) -> String {
        let Some(token) = self.pattern.captures(ci_name).and_then(|c| c.get(1)) else {
            warn!(ci_name, "设备名中未找到型号，使用默认型号");
            return DEFAULT_MODEL.to_string();
        };
        let model = token.as_str().replace("(G)", "");

        match self.mapping.iter().find(|(prefix, _)| model.starts_with(prefix.as_str())) {
            Some((prefix, family)) => {
                debug!(ci_name, prefix = %prefix, family = %family, "型号映射命中");
                family.clone()
            }
            None => {
                warn!(ci_name, model = %model, "型号没有映射，直接使用型号");
                model
            }
        }
    }
}

// ==========================================
// ConfigRenderer
// ==========================================
pub struct ConfigRenderer {
    tera: Tera,
    resolver: ModelResolver,
    template_name: BTreeMap<String, String>,
    save_dir: PathBuf,
}

impl ConfigRenderer {
    /// 加载模板目录（递归）
    ///
    /// # 参数
    /// - templates_dir: 模板根目录，模板名为其相对路径
    /// - template_name: 型号族 → 模板名
    /// - resolver: 型号解析器
    /// - save_dir: 输出目录
    pub fn from_dir(
        templates_dir: &Path,
        template_name: BTreeMap<String, String>,
        resolver: ModelResolver,
        save_dir: PathBuf,
    ) -> RenderResult<Self> {
        let glob = format!("{}/**/*", templates_dir.display());
        let mut tera = Tera::new(&glob).map_err(|source| RenderError::TemplateLoad {
            dir: templates_dir.display().to_string(),
            source,
        })?;
        tera.autoescape_on(vec![]);
        register_filters(&mut tera);

        info!(
            dir = %templates_dir.display(),
            templates = tera.get_template_names().count(),
            "模板目录加载完成"
        );
        Ok(Self {
            tera,
            resolver,
            template_name,
            save_dir,
        })
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// 设备使用的 (型号族, 模板名)
    pub fn template_for(&self, ci_name: &str) -> (String, String) {
        let model = self.resolver.resolve(ci_name);
        let template = self
            .template_name
            .get(&model)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
        debug!(ci_name, model = %model, template = %template, "选择模板");
        (model, template)
    }

    /// 渲染单台设备
    ///
    /// # 规则
    /// - S57XX 型号族关闭全局 VLAN 段，管理接口固定为 MEth0/0/1
    pub fn render(&self, mut context: DeviceConfigContext) -> RenderResult<String> {
        let ci_name = context.ci_name.clone();
        let (model, template) = self.template_for(&ci_name);

        if model == S57XX_MODEL {
            context.option_global_vlan = false;
            context.basic.manage_int = Some(S57XX_MANAGE_INT.to_string());
            debug!(ci_name = %ci_name, "应用 S57XX 特殊配置");
        }

        if !self.tera.get_template_names().any(|name| name == template) {
            return Err(RenderError::TemplateNotFound {
                template,
                ci_name,
            });
        }

        let render_error = |e: tera::Error| RenderError::Render {
            template: template.clone(),
            ci_name: ci_name.clone(),
            message: error_chain(&e),
        };
        let tera_context = Context::from_serialize(&context).map_err(render_error)?;
        self.tera.render(&template, &tera_context).map_err(render_error)
    }

    /// 保存 `<ci_name>.txt`（目录不存在时创建，已有文件覆盖）
    pub fn save(&self, ci_name: &str, content: &str) -> RenderResult<PathBuf> {
        let save_error = |path: &Path, source| RenderError::Save {
            path: path.display().to_string(),
            source,
        };
        fs::create_dir_all(&self.save_dir).map_err(|e| save_error(&self.save_dir, e))?;
        let path = self.save_dir.join(format!("{}.txt", ci_name));
        fs::write(&path, content).map_err(|e| save_error(&path, e))?;
        info!(ci_name, path = %path.display(), "设备配置已保存");
        Ok(path)
    }

    /// 渲染并保存
    pub fn render_device(&self, context: DeviceConfigContext) -> RenderResult<PathBuf> {
        let ci_name = context.ci_name.clone();
        let content = self.render(context)?;
        self.save(&ci_name, &content)
    }
}

/// tera 错误的完整原因链
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
