// ==========================================
// LLD 配置生成工具 - 网络地址与编号文本规则
// ==========================================
// 依据: LLD 规划表书写约定（IP/掩码、CI 对、VLAN 范围）
// 职责: 纯函数形式的地址拆分、掩码换算、VLAN 范围压缩
// ==========================================

use crate::domain::fields::RecordError;
use ipnetwork::{ipv4_mask_to_prefix, IpNetwork, Ipv4Network};
use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;
use tracing::warn;

/// 合法 VLAN 编号
pub const VLAN_ID_RANGE: RangeInclusive<i64> = 1..=4094;

/// VRRP 虚拟 MAC 末段可用的最大序号（两位十进制）
pub const MAX_VIRTUAL_MAC_INDEX: usize = 99;

/// 拆分 "IP/掩码"（无 "/" 视为格式错误）
pub fn split_ip_mask(value: &str) -> Result<(String, String), RecordError> {
    match value.split_once('/') {
        Some((ip, mask)) => Ok((ip.trim().to_string(), mask.trim().to_string())),
        None => Err(RecordError::invalid("ip/mask", value, "缺少 '/' 分隔符")),
    }
}

/// 拆分 "CI1,CI2"（必须恰好两个设备）
pub fn split_ci_pair(value: &str) -> Result<(String, String), RecordError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => {
            Ok((first.to_string(), second.to_string()))
        }
        _ => Err(RecordError::invalid("ci_name", value, "应为逗号分隔的两台设备")),
    }
}

/// 是否为整数文本
pub fn is_integer(value: &str) -> bool {
    value.trim().parse::<i64>().is_ok()
}

/// 掩码 → 前缀长度（支持 "30" 与 "255.255.255.252" 两种写法）
pub fn prefix_len(mask: &str) -> Option<u8> {
    let mask = mask.trim();
    if let Ok(len) = mask.parse::<u8>() {
        return (len <= 32).then_some(len);
    }
    ipv4_mask_to_prefix(mask.parse::<Ipv4Addr>().ok()?).ok()
}

/// "网络" + "掩码" → 网段（掩码两种写法均可，IPv6 仅支持前缀长度）
pub fn parse_network(net: &str, mask: &str) -> Result<IpNetwork, RecordError> {
    let addr: IpAddr = net
        .trim()
        .parse()
        .map_err(|_| RecordError::invalid("network", net, "不是合法的 IP 地址"))?;
    let prefix = match mask.trim().parse::<u8>() {
        Ok(len) => len,
        Err(_) => prefix_len(mask)
            .ok_or_else(|| RecordError::invalid("mask", mask, "不是合法的掩码"))?,
    };
    IpNetwork::new(addr, prefix).map_err(|e| RecordError::invalid("mask", mask, e.to_string()))
}

/// /30 网段内另一台主机地址
///
/// # 规则
/// - 掩码必须为 30 位，否则报错
/// - 返回同网段两个可用地址中不等于 ip 的那个
pub fn peer_host_in_slash30(ip: &str, mask: &str) -> Result<String, RecordError> {
    if prefix_len(mask) != Some(30) {
        return Err(RecordError::invalid("dad_mask", mask, "掩码必须为 30 位"));
    }
    let addr: Ipv4Addr = ip
        .trim()
        .parse()
        .map_err(|_| RecordError::invalid("dad_ip", ip, "不是合法的 IPv4 地址"))?;
    let network = Ipv4Network::new(addr, 30)
        .map_err(|e| RecordError::invalid("dad_mask", mask, e.to_string()))?;
    let hosts: Vec<Ipv4Addr> = network.iter().skip(1).take(2).collect();
    let peer = hosts
        .iter()
        .find(|host| **host != addr)
        .or(hosts.first())
        .copied()
        .unwrap_or(network.network());
    Ok(peer.to_string())
}

/// IPv4 → "host_name" + 8 位十六进制
pub fn ipv4_host_token(ip: &str) -> Result<String, RecordError> {
    let addr: Ipv4Addr = ip
        .trim()
        .parse()
        .map_err(|_| RecordError::invalid("target_host", ip, "不是合法的 IPv4 地址"))?;
    Ok(format!("host_name{:08x}", u32::from(addr)))
}

/// 设备侧 MAC 写法 xxxx-xxxx-xxxx（十六进制）
pub fn is_dotted_mac(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == 3
        && groups
            .iter()
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_hexdigit()))
}

/// 第 index 个 VRRP 虚拟 MAC（00-00-5e-00-01-NN 的设备侧写法，NN 为两位十进制）
///
/// # 返回
/// - None: 序号超出两位，无法构成合法 MAC
pub fn vrrp_virtual_mac(index: usize) -> Option<String> {
    if index > MAX_VIRTUAL_MAC_INDEX {
        warn!(index, max = MAX_VIRTUAL_MAC_INDEX, "虚拟 MAC 序号超出上限，不再分配");
        return None;
    }
    Some(format!("0000-5e00-01{:02}", index))
}

/// 校验 VLAN 闭区间 [start, end]
pub fn vlan_span(start: i64, end: i64) -> Result<RangeInclusive<i64>, &'static str> {
    if !VLAN_ID_RANGE.contains(&start) || !VLAN_ID_RANGE.contains(&end) {
        return Err("VLAN 编号超出 1-4094");
    }
    if start > end {
        return Err("VLAN 范围起止颠倒");
    }
    Ok(start..=end)
}

/// 有序整数序列压缩为 "x" / "x to y" 片段
pub fn compress_ranges(sorted: &[i64]) -> Vec<String> {
    let mut ranges = Vec::new();
    let mut iter = sorted.iter().copied();
    let Some(first) = iter.next() else {
        return ranges;
    };

    fn flush(start: i64, end: i64, ranges: &mut Vec<String>) {
        if start == end {
            ranges.push(start.to_string());
        } else {
            ranges.push(format!("{} to {}", start, end));
        }
    }

    let (mut start, mut end) = (first, first);

    for num in iter {
        if num - end > 1 {
            flush(start, end, &mut ranges);
            start = num;
        }
        end = num;
    }
    flush(start, end, &mut ranges);
    ranges
}

/// VLAN 列表规范化
///
/// # 规则
/// - 已是 "x to y" 写法或空格分隔整数时原样返回
/// - 否则按 "," 切分，"a-b" 展开为闭区间，排序后压缩为空格分隔的片段
/// - 任一片段无法解析、超出 1-4094 或起止颠倒时返回 None
pub fn format_number_ranges(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let already_formatted = trimmed.contains("to")
        || (!trimmed.is_empty()
            && trimmed
                .split_whitespace()
                .all(|t| t.chars().all(|c| c.is_ascii_digit())));
    if already_formatted {
        return Some(input.to_string());
    }

    let mut numbers = Vec::new();
    for segment in input.split(',') {
        if segment.contains('-') {
            let bounds: Vec<&str> = segment.split('-').collect();
            let [start, end] = bounds.as_slice() else {
                return None;
            };
            let start: i64 = start.trim().parse().ok()?;
            let end: i64 = end.trim().parse().ok()?;
            numbers.extend(vlan_span(start, end).ok()?);
        } else {
            let id: i64 = segment.trim().parse().ok()?;
            numbers.extend(vlan_span(id, id).ok()?);
        }
    }
    if numbers.is_empty() {
        return None;
    }

    numbers.sort_unstable();
    Some(compress_ranges(&numbers).join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ip_mask() {
        assert_eq!(
            split_ip_mask("10.0.0.1/30").unwrap(),
            ("10.0.0.1".to_string(), "30".to_string())
        );
        assert!(split_ip_mask("10.0.0.1").is_err());
    }

    #[test]
    fn test_split_ci_pair() {
        assert_eq!(
            split_ci_pair("SW1,SW2").unwrap(),
            ("SW1".to_string(), "SW2".to_string())
        );
        assert!(split_ci_pair("SW1").is_err());
        assert!(split_ci_pair("SW1,SW2,SW3").is_err());
    }

    #[test]
    fn test_prefix_len_both_notations() {
        assert_eq!(prefix_len("30"), Some(30));
        assert_eq!(prefix_len("255.255.255.252"), Some(30));
        assert_eq!(prefix_len("255.0.255.0"), None);
        assert_eq!(prefix_len("33"), None);
    }

    #[test]
    fn test_peer_host_in_slash30() {
        assert_eq!(peer_host_in_slash30("10.1.1.1", "30").unwrap(), "10.1.1.2");
        assert_eq!(
            peer_host_in_slash30("10.1.1.2", "255.255.255.252").unwrap(),
            "10.1.1.1"
        );
        // 非 30 位掩码拒绝
        assert!(peer_host_in_slash30("10.1.1.1", "24").is_err());
    }

    #[test]
    fn test_ipv4_host_token() {
        assert_eq!(ipv4_host_token("10.0.0.1").unwrap(), "host_name0a000001");
        assert!(ipv4_host_token("not-an-ip").is_err());
    }

    #[test]
    fn test_dotted_mac() {
        assert!(is_dotted_mac("00e0-fc12-3456"));
        assert!(!is_dotted_mac("00:e0:fc:12:34:56"));
        assert!(!is_dotted_mac("-"));
        assert_eq!(vrrp_virtual_mac(1).as_deref(), Some("0000-5e00-0101"));
        assert_eq!(vrrp_virtual_mac(99).as_deref(), Some("0000-5e00-0199"));
        // 三位序号无法构成 MAC
        assert_eq!(vrrp_virtual_mac(100), None);
    }

    #[test]
    fn test_parse_network() {
        let network = parse_network("10.0.0.0", "24").unwrap();
        assert_eq!(network.prefix(), 24);
        assert_eq!(network.network().to_string(), "10.0.0.0");
        assert_eq!(parse_network("10.0.0.0", "255.255.0.0").unwrap().prefix(), 16);
        assert_eq!(parse_network("0.0.0.0", "0").unwrap().prefix(), 0);
        assert!(parse_network("not-an-ip", "24").is_err());
        assert!(parse_network("10.0.0.0", "40").is_err());
        assert_eq!(parse_network("2001:db8::", "64").unwrap().prefix(), 64);
    }

    #[test]
    fn test_vlan_span_bounds() {
        assert_eq!(vlan_span(100, 102).unwrap().count(), 3);
        assert!(vlan_span(0, 10).is_err());
        assert!(vlan_span(1, 4_000_000_000).is_err());
        assert!(vlan_span(5, 3).is_err());
    }

    #[test]
    fn test_compress_ranges() {
        assert_eq!(
            compress_ranges(&[1, 2, 3, 5, 7, 8, 9]),
            vec!["1 to 3", "5", "7 to 9"]
        );
        assert!(compress_ranges(&[]).is_empty());
    }

    #[test]
    fn test_format_number_ranges() {
        assert_eq!(
            format_number_ranges("7-9,1,2-3,5").as_deref(),
            Some("1 to 3 5 7 to 9")
        );
        // 已规范化的写法原样返回
        assert_eq!(format_number_ranges("10 to 20").as_deref(), Some("10 to 20"));
        assert_eq!(format_number_ranges("10 20 30").as_deref(), Some("10 20 30"));
        // 无法解析
        assert_eq!(format_number_ranges("-"), None);
        assert_eq!(format_number_ranges("NA"), None);
        // 越界与起止颠倒
        assert_eq!(format_number_ranges("1-4000000000"), None);
        assert_eq!(format_number_ranges("5-3"), None);
        assert_eq!(format_number_ranges("1,4095"), None);
    }
}
