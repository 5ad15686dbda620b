//! 数据包类型
//!
//! 定义应用消息、传输层数据包及校验和。

use std::fmt;

/// 消息（以及数据包载荷）的固定长度
pub const MSG_SIZE: usize = 20;
/// 载荷以此开头的包是确认包
pub const ACK_MARKER: &[u8] = b"ACK";

/// 应用消息：对协议不透明的定长字节。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub data: [u8; MSG_SIZE],
}

impl Message {
    /// 整条消息填充同一个字节
    pub fn filled(byte: u8) -> Self {
        Self {
            data: [byte; MSG_SIZE],
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({:?})", String::from_utf8_lossy(&self.data))
    }
}

/// 传输层数据包
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    pub seq: u32,
    pub ack: u32,
    pub checksum: u32,
    pub payload: [u8; MSG_SIZE],
}

/// seq + ack + 每个载荷字节之和（回绕加法）
pub fn compute_checksum(seq: u32, ack: u32, payload: &[u8; MSG_SIZE]) -> u32 {
    payload
        .iter()
        .fold(seq.wrapping_add(ack), |sum, &b| sum.wrapping_add(b as u32))
}

impl Packet {
    /// 数据包：`ack` 置 0，校验和按当前字段计算
    pub fn data(seq: u32, msg: &Message) -> Self {
        let mut pkt = Self {
            seq,
            ack: 0,
            checksum: 0,
            payload: msg.data,
        };
        pkt.seal();
        pkt
    }

    /// 针对某个数据包的确认包：回显其 seq，`ack` = 被确认的 seq
    pub fn ack_for(data: &Packet) -> Self {
        let mut payload = [0u8; MSG_SIZE];
        payload[..ACK_MARKER.len()].copy_from_slice(ACK_MARKER);
        let mut pkt = Self {
            seq: data.seq,
            ack: data.seq,
            checksum: 0,
            payload,
        };
        pkt.seal();
        pkt
    }

    /// 重新计算并写入校验和
    pub fn seal(&mut self) {
        self.checksum = compute_checksum(self.seq, self.ack, &self.payload);
    }

    pub fn checksum_valid(&self) -> bool {
        self.checksum == compute_checksum(self.seq, self.ack, &self.payload)
    }

    pub fn is_ack(&self) -> bool {
        self.payload.starts_with(ACK_MARKER)
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("seq", &self.seq)
            .field("ack", &self.ack)
            .field("checksum", &self.checksum)
            .field("payload", &String::from_utf8_lossy(&self.payload))
            .finish()
    }
}
