// One error type for the whole crate.
// Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),   // Creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("camera init error: {0}")]
    CameraInit(String),   // Opening/starting the camera failed
    #[error("camera frame error: {0}")]
    CameraFrame(String),  // Grabbing/decoding a frame failed
    #[error("snapshot error: {0}")]
    Snapshot(String),     // Encoding the canvas failed
    #[error("restore error: {0}")]
    Restore(String),      // Decoding a snapshot back into the canvas failed
    #[error("export error: {0}")]
    Export(String),       // Writing the PNG to disk failed
    #[error("hand observation needs 21 landmarks, got {got}")]
    LandmarkCount { got: usize },
    #[error("tracker spawn error: {0}")]
    TrackerSpawn(String), // Starting the external detector failed
    #[error("tracker protocol error: {0}")]
    TrackerProtocol(String), // Detector talked back in a way we can't read
    #[error("config error: {0}")]
    Config(String),
}
