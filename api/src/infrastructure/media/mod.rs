pub mod ffmpeg_cover;
