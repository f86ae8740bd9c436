use custom_error::custom_error;

pub type Result<T> = std::result::Result<T, Error>;

custom_error! {pub Error
    Io{source: std::io::Error} = "I/O error",
    Json{source: serde_json::Error} = "JSON error",
    InputTooLarge{len: usize, max: usize} = "ATIS text is {len} bytes, refusing anything over {max}"
}

custom_error! {pub InvalidDesignator{raw: String} = "not a runway designator: {raw}"}
