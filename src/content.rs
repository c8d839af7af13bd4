//! Static page-shell copy: hero, about, and FAQ sections. Pure data, no
//! behavior.

pub const HERO_TITLE: &str = "Advanced DeepFake Detection";

pub const HERO_TAGLINE: &str = "Our cutting-edge AI technology helps you identify manipulated \
media with over 95% accuracy. Protect yourself from misinformation in today's digital world.";

pub const ABOUT: &str = "DeFakeX uses state-of-the-art deep learning models trained on \
thousands of real and manipulated media samples. Our algorithm analyzes subtle artifacts in \
facial movements, lighting inconsistencies, and compression patterns to detect deepfakes with \
industry-leading accuracy.";

#[derive(Debug, Clone, Copy)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "How accurate is the detection?",
        answer: "Our system achieves 95-98% accuracy on standard benchmarks. Real-world \
performance may vary based on video quality, compression, and the sophistication of the \
deepfake technology used. Higher quality media generally yields more accurate results.",
    },
    FaqEntry {
        question: "What file formats are supported?",
        answer: "Videos: MP4, AVI, MOV (up to 100MB)\nImages: JPG, PNG, WEBP (up to 20MB)\n\
We recommend using the highest quality files available for best results.",
    },
    FaqEntry {
        question: "Is my data stored or shared?",
        answer: "No. All processing happens in your browser or our secure servers with \
immediate deletion after analysis. We do not store, share, or use your media for any purpose \
beyond the immediate detection you request.",
    },
    FaqEntry {
        question: "How does the detection technology work?",
        answer: "Our AI uses deep learning models trained on thousands of real and fake \
examples. It analyzes subtle inconsistencies in facial movements, lighting patterns, blending \
boundaries, and compression artifacts that are typically invisible to the human eye but \
present in manipulated media.",
    },
    FaqEntry {
        question: "Can DeFakeX detect all types of deepfakes?",
        answer: "While we continuously update our models to detect the latest deepfake \
technologies, no system can guarantee 100% detection of all manipulated media. Very \
sophisticated deepfakes created with cutting-edge technology may sometimes be more \
challenging to detect.",
    },
    FaqEntry {
        question: "Do I need special hardware to use DeFakeX?",
        answer: "No, DeFakeX runs in your web browser on most modern devices. For \
camera-based detection, you'll need a device with a webcam. For best performance, we \
recommend using an updated browser and a device manufactured within the last 4-5 years.",
    },
];
