pub mod capture;
pub mod device;
pub mod wav;

pub use capture::{RecordedAudio, Recorder};
pub use device::{find_monitor_device, list_input_devices, select_input_config};
pub use wav::{downmix_to_mono, normalize_to_i16, write_wav};
