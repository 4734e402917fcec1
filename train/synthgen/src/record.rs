use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct MaskRecord {
    pub category: &'static str,
    pub path: String,
}

/// One line of `samples.jsonl`.
#[derive(Serialize, Debug)]
pub struct SampleRecord {
    pub schema: &'static str,
    pub id: u64,
    pub image: String,
    pub imsize: u32,
    pub seed: u64,
    pub scene: usize,
    pub masks: Vec<MaskRecord>,
}
