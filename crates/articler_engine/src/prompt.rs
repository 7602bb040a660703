use rand::seq::IndexedRandom;
use rand::Rng;

use crate::completion::CompletionRequest;

pub const SYSTEM_PROMPT: &str = "You are a professional Chinese SEO content writer.";

pub const STYLES: [&str; 8] = [
    "以旅行笔记的方式书写，语气轻快自然。",
    "以文化观察的角度表达，句式独特，有深度。",
    "以生活体验的语气叙述，细腻而真实。",
    "以专业解读的风格呈现，逻辑清晰但不生硬。",
    "以故事叙述的节奏展开，句式灵活，有画面感。",
    "以感受性语言表达主题，带有情绪起伏。",
    "以轻松科普的语气介绍，信息自然融入内容。",
    "以讨论式语气撰写，带一点思考感。",
];

pub const TONES: [&str; 5] = [
    "语言不拘一格，句式有长有短，节奏感自然变化。",
    "不要使用逻辑连接词，如：首先、其次、最后、因此、总之。",
    "句子之间保持意境流动，不强调结构逻辑。",
    "用不规则的句式表达内容，让语感更自由。",
    "避免标准化句子，让文字带一点不确定的呼吸感。",
];

const MIN_TEMPERATURE: f64 = 0.65;
const MAX_TEMPERATURE: f64 = 0.95;

/// Per-call style hint, tone hint and sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptVariation {
    pub style: String,
    pub tone: String,
    pub temperature: f64,
}

/// Chooses the variation used for one generation call.
pub trait VariationStrategy: Send + Sync {
    fn pick(&self) -> PromptVariation;
}

/// Uniform choice over [`STYLES`] and [`TONES`], temperature in
/// 0.65..=0.95 rounded to two decimals.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomVariation;

impl VariationStrategy for RandomVariation {
    fn pick(&self) -> PromptVariation {
        let mut rng = rand::rng();
        let style = STYLES.choose(&mut rng).copied().unwrap_or(STYLES[0]);
        let tone = TONES.choose(&mut rng).copied().unwrap_or(TONES[0]);
        let raw: f64 = rng.random_range(MIN_TEMPERATURE..=MAX_TEMPERATURE);
        PromptVariation {
            style: style.to_string(),
            tone: tone.to_string(),
            temperature: (raw * 100.0).round() / 100.0,
        }
    }
}

/// Always returns the same variation.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedVariation(pub PromptVariation);

impl Default for FixedVariation {
    fn default() -> Self {
        Self(PromptVariation {
            style: STYLES[0].to_string(),
            tone: TONES[0].to_string(),
            temperature: 0.7,
        })
    }
}

impl VariationStrategy for FixedVariation {
    fn pick(&self) -> PromptVariation {
        self.0.clone()
    }
}

/// User prompt for one article.
pub fn build_prompt(request: &CompletionRequest, variation: &PromptVariation) -> String {
    let CompletionRequest {
        main_keyword,
        sub1,
        sub2,
        ..
    } = request;
    let PromptVariation { style, tone, .. } = variation;
    format!(
        "你是一位中文SEO原创作者，请根据以下要求撰写一段自然内容。\n\
         \n\
         主题：{main_keyword}\n\
         \n\
         写作要求：\n\
         1. 直接进入主题，不要有任何开场或引入语；\n\
         2. 全文长度约100字左右；\n\
         3. 自然地包含“{main_keyword}”3至4次；\n\
         4. 同时自然提及“{sub1}”与“{sub2}”；\n\
         5. 每篇文字的句式、词汇、语气、结构都应不同；\n\
         6. 语言自然，不使用模板化句式；\n\
         7. {style}\n\
         8. {tone}\n\
         9. 只生成正文内容，不加标题、总结或符号。\n"
    )
}
