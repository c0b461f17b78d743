//! PCM → WAV 编码器
//!
//! 将 TTS 服务返回的裸 PCM 字节流（16 位小端、单声道）打包为
//! 标准 RIFF/WAVE 容器，并编码为内联 data URI。
//! 纯函数，无 I/O，无共享状态。

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// WAV 头固定长度（RIFF 头 + fmt chunk + data chunk 头）
const WAV_HEADER_LEN: usize = 44;

/// 将裸 PCM 字节打包为 WAV 容器
///
/// 输入假定为 16 位小端单声道 PCM，采样率由调用方提供。
/// 不做重采样、混音或位深转换，数据段原样附在 44 字节头之后。
/// 空 PCM 输入产生结构合法的静音 WAV（44 字节，data 段长度 0）。
pub fn wav_from_pcm(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_channels: u16 = 1;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let data_size = pcm.len();
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());
    wav.extend_from_slice(pcm);

    wav
}

/// 将裸 PCM 打包为 WAV 并编码为 `data:audio/wav;base64,...` data URI
pub fn wav_data_uri(pcm: &[u8], sample_rate: u32) -> String {
    let wav = wav_from_pcm(pcm, sample_rate);
    format!("data:audio/wav;base64,{}", BASE64.encode(wav))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32_le(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ])
    }

    fn read_u16_le(data: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([data[offset], data[offset + 1]])
    }

    #[test]
    fn test_wav_header_layout() {
        let pcm: Vec<u8> = (0..200u16).flat_map(|s| s.to_le_bytes()).collect();
        let wav = wav_from_pcm(&pcm, 24000);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(read_u32_le(&wav, 4), 36 + pcm.len() as u32);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(read_u32_le(&wav, 16), 16); // Subchunk1Size
        assert_eq!(read_u16_le(&wav, 20), 1); // PCM
        assert_eq!(read_u16_le(&wav, 22), 1); // 单声道
        assert_eq!(read_u32_le(&wav, 24), 24000); // SampleRate
        assert_eq!(read_u32_le(&wav, 28), 48000); // ByteRate = SampleRate * 2
        assert_eq!(read_u16_le(&wav, 32), 2); // BlockAlign
        assert_eq!(read_u16_le(&wav, 34), 16); // BitsPerSample
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(read_u32_le(&wav, 40), pcm.len() as u32);
    }

    #[test]
    fn test_wav_data_section_unmodified() {
        let pcm = vec![0x01, 0x02, 0x03, 0x04, 0xff, 0xfe];
        let wav = wav_from_pcm(&pcm, 24000);

        assert_eq!(wav.len(), 44 + pcm.len());
        assert_eq!(&wav[44..], &pcm[..]);
    }

    #[test]
    fn test_empty_pcm_produces_valid_silent_wav() {
        let wav = wav_from_pcm(&[], 24000);

        assert_eq!(wav.len(), 44);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(read_u32_le(&wav, 4), 36);
        assert_eq!(read_u32_le(&wav, 40), 0); // Subchunk2Size = 0
    }

    #[test]
    fn test_deterministic_output() {
        let pcm = vec![9u8; 128];
        assert_eq!(wav_from_pcm(&pcm, 24000), wav_from_pcm(&pcm, 24000));
        assert_eq!(wav_data_uri(&pcm, 24000), wav_data_uri(&pcm, 24000));
    }

    #[test]
    fn test_sample_rate_round_trip() {
        for rate in [8000u32, 16000, 22050, 24000, 48000] {
            let wav = wav_from_pcm(&[0u8; 32], rate);
            assert_eq!(read_u32_le(&wav, 24), rate);
            assert_eq!(read_u32_le(&wav, 28), rate * 2);
        }
    }

    #[test]
    fn test_data_uri_prefix_and_decode() {
        let pcm = vec![0x10, 0x20, 0x30, 0x40];
        let uri = wav_data_uri(&pcm, 24000);

        let payload = uri
            .strip_prefix("data:audio/wav;base64,")
            .expect("data URI prefix");
        let decoded = BASE64.decode(payload).unwrap();
        assert_eq!(decoded, wav_from_pcm(&pcm, 24000));
    }
}
