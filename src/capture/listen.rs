use std::io;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::capture::stats::CaptureStats;
use crate::capture::CaptureSource;
use crate::decoder::DecodedPacket;
use crate::error::CaptureError;
use crate::frames::raw_frame::RawFrame;
use crate::headers::decode_ethernet;

/// Consecutive receive errors after which the capture source is given up.
const MAX_CONSECUTIVE_ERRORS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenOptions {
    /// Frames that can wait between the capture thread and the decoder.
    pub channel_capacity: usize,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

/// Reads frames from `source` on a blocking thread and decodes them in capture order,
/// handing every decoded packet to `on_packet`.
///
/// Frames that are not IPv4 are skipped, and frames that cannot be decoded are counted and dropped.
/// Returns once the source is exhausted, `max_frames` frames have been seen, or Ctrl-C is pressed.
pub async fn listen<S, F>(
    source: S,
    options: ListenOptions,
    mut on_packet: F,
) -> Result<CaptureStats, CaptureError>
where
    S: CaptureSource + Send + 'static,
    F: FnMut(&DecodedPacket<'_>),
{
    let (tx, mut rx) = mpsc::channel(options.channel_capacity.max(1));
    let reader = tokio::task::spawn_blocking(move || read_frames(source, &tx));

    let mut stats = CaptureStats::default();
    let mut source_done = false;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while options.max_frames.map_or(true, |max| stats.frames < max) {
        tokio::select! {
            frame = rx.recv() => {
                let Some(frame) = frame else {
                    source_done = true;
                    break;
                };
                handle_frame(&frame, &mut stats, &mut on_packet);
            }
            _ = &mut shutdown => {
                info!("interrupted, stopping capture");
                break;
            }
        }
    }

    // the reader notices the closed channel on its next frame or read timeout
    drop(rx);
    if source_done {
        reader
            .await
            .map_err(|e| CaptureError::Io(io::Error::other(e)))??;
    }

    info!("capture summary: {stats}");
    Ok(stats)
}

fn read_frames<S: CaptureSource>(mut source: S, tx: &mpsc::Sender<RawFrame>) -> io::Result<()> {
    let mut consecutive_errors = 0;
    loop {
        match source.next_frame() {
            Ok(frame) => {
                consecutive_errors = 0;
                if tx.blocking_send(frame).is_err() {
                    // decoder is gone
                    return Ok(());
                }
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                if tx.is_closed() {
                    return Ok(());
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    return Err(e);
                }
                warn!("cannot receive frame: {e}");
            }
        }
    }
}

fn handle_frame<F>(frame: &RawFrame, stats: &mut CaptureStats, on_packet: &mut F)
where
    F: FnMut(&DecodedPacket<'_>),
{
    if let Ok(ethernet) = decode_ethernet(frame.bytes()) {
        if ethernet.is_vlan_tagged() {
            debug!("skipping VLAN tagged frame ({} bytes)", frame.len());
            stats.record_skipped();
            return;
        }
        if !ethernet.carries_ipv4() {
            debug!(
                "skipping frame with EtherType {:#06x} ({} bytes)",
                ethernet.ether_type,
                frame.len()
            );
            stats.record_skipped();
            return;
        }
    }

    match frame.decode() {
        Ok(packet) => {
            stats.record_decoded(&packet);
            on_packet(&packet);
        }
        Err(err) => {
            debug!("cannot decode frame of {} bytes: {err}", frame.len());
            stats.record_error(&err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use chrono::Utc;

    use crate::capture::listen::{listen, ListenOptions};
    use crate::capture::stats::CaptureStats;
    use crate::capture::CaptureSource;
    use crate::decoder::tests::{tcp_frame, udp_frame};
    use crate::error::CaptureError;
    use crate::frames::raw_frame::RawFrame;

    /// Source replaying results from memory, then reporting end of stream.
    struct ReplaySource(VecDeque<io::Result<Vec<u8>>>);

    impl ReplaySource {
        fn frames(frames: Vec<Vec<u8>>) -> Self {
            Self(frames.into_iter().map(Ok).collect())
        }
    }

    impl CaptureSource for ReplaySource {
        fn next_frame(&mut self) -> io::Result<RawFrame> {
            match self.0.pop_front() {
                Some(result) => result.map(|bytes| RawFrame::new(bytes, Utc::now())),
                None => Err(io::ErrorKind::UnexpectedEof.into()),
            }
        }
    }

    fn options(max_frames: Option<u64>) -> ListenOptions {
        ListenOptions {
            channel_capacity: 4,
            max_frames,
        }
    }

    fn arp_frame() -> Vec<u8> {
        let mut frame = udp_frame();
        frame[12] = 0x08;
        frame[13] = 0x06;
        frame
    }

    fn vlan_frame() -> Vec<u8> {
        let mut frame = udp_frame();
        frame[12] = 0x81;
        frame[13] = 0x00;
        frame
    }

    #[tokio::test]
    async fn test_listen_decodes_in_capture_order() {
        let mut truncated_ip = udp_frame();
        truncated_ip.truncate(20);

        let source = ReplaySource::frames(vec![
            udp_frame(),
            arp_frame(),
            vlan_frame(),
            vec![0; 6],
            truncated_ip,
            tcp_frame(),
        ]);

        let mut ports = Vec::new();
        let stats = listen(source, options(None), |packet| {
            ports.push(packet.transport.ports());
        })
        .await
        .unwrap();

        assert_eq!(ports, vec![Some((5353, 53)), Some((50000, 80))]);
        assert_eq!(
            stats,
            CaptureStats {
                frames: 6,
                skipped: 2,
                decoded: 2,
                truncated: 2,
                invalid_header_length: 0,
                tcp: 1,
                udp: 1,
                other: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_listen_stops_after_max_frames() {
        let source = ReplaySource::frames(vec![udp_frame(); 10]);

        let mut seen = 0;
        let stats = listen(source, options(Some(3)), |_| seen += 1)
            .await
            .unwrap();

        assert_eq!(seen, 3);
        assert_eq!(stats.frames, 3);
    }

    #[tokio::test]
    async fn test_listen_skips_transient_errors() {
        let mut results: VecDeque<io::Result<Vec<u8>>> = VecDeque::new();
        results.push_back(Err(io::ErrorKind::Interrupted.into()));
        results.push_back(Ok(udp_frame()));
        let source = ReplaySource(results);

        let stats = listen(source, options(None), |_| {}).await.unwrap();
        assert_eq!(stats.decoded, 1);
    }

    #[tokio::test]
    async fn test_listen_read_timeouts_are_not_errors() {
        let mut results: VecDeque<io::Result<Vec<u8>>> = (0..32)
            .map(|_| Err(io::ErrorKind::TimedOut.into()))
            .collect();
        results.push_back(Ok(tcp_frame()));
        let source = ReplaySource(results);

        let stats = listen(source, options(None), |_| {}).await.unwrap();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.tcp, 1);
    }

    #[tokio::test]
    async fn test_listen_gives_up_on_persistent_errors() {
        let results = (0..32)
            .map(|_| Err(io::Error::other("network is down")))
            .collect();
        let source = ReplaySource(results);

        let result = listen(source, options(None), |_| {}).await;
        assert!(matches!(result, Err(CaptureError::Io(_))));
    }
}
