// ==========================================
// LLD 配置生成工具 - 领域模型层
// ==========================================
// 依据: LLD 规划表结构 + 设备配置模板所需数据
// ==========================================
// 职责: 定义工作簿模型、表头结构、类型化记录与构造规则
// 红线: 不含文件访问逻辑,不含渲染逻辑
// ==========================================

pub mod device;
pub mod fields;
pub mod interface;
pub mod netaddr;
pub mod record;
pub mod routing;
pub mod table;
pub mod table_head;
pub mod types;

// 重导出核心类型
pub use device::{BasicConfig, LoopbackConfig, NetConfConfig, SnmpConfig, VrfConfig};
pub use fields::{Fields, FromFields, RecordError};
pub use interface::{InterfaceConfig, L3InterfaceConfig};
pub use record::Record;
pub use routing::{BfdConfig, GatewayConfig, GlobalVlan, MlagConfig, StaticRouteConfig, VlanBatch};
pub use table::{Cell, NormalizedTable, Row, RowFilter, Sheet, TableRegion, Workbook};
pub use table_head::TableHead;
pub use types::{DeviceRecords, FieldValue, RecordKind, PLACEHOLDER};
