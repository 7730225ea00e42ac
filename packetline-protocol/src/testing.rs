//! Test doubles shared by the unit tests

use crate::packet::{Packet, PacketHandler, Responder};

/// Handler that copies every packet it receives
#[derive(Debug, Default)]
pub struct Recorder {
    pub packets: Vec<Vec<Vec<u8>>>,
    pub clamped: usize,
}

impl<T: ?Sized> PacketHandler<T> for Recorder {
    fn on_packet(&mut self, packet: &Packet<'_>, _responder: &mut Responder<'_, T>) {
        self.packets.push(packet.iter().map(<[u8]>::to_vec).collect());
        if packet.was_clamped() {
            self.clamped += 1;
        }
    }
}
