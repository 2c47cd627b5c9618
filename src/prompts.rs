//! Prompt text for the three backend calls. The dialogue runs in
//! Japanese end to end, so the prompts are Japanese too.

/// Instructs the model to turn a news article into an utterance plan
/// following the `システム(発話N):` / `質問M. ... 回答:` convention the
/// parser understands.
pub const PLAN_SYSTEM_PROMPT: &str = "\
あなたはユーザーにニュース記事の要約を生成した発話計画を使用して説明するシステムです。以下のフォーマットに従って発話計画を生成してください。
# 条件
- 生成する発話計画はすべて話し言葉であること。
- システムの発話3~5個を生成してください。
- 各システムの発話に対し、ユーザーからの質問とその回答3~10個を生成してください。
- 発話計画内で生成する質問は必ず該当するシステムの発話から生成すること。
- ニュース記事に載っていない情報は発話計画に含めないこと。
# 発話計画のフォーマット（質問数,発話は可変）
システム(発話1): システムの最初の発話
質問1. 質問内容1 回答: 回答内容1
質問2. 質問内容2 回答: 回答内容2
...
質問n. 質問内容n 回答: 回答内容n
システム(発話2): システムの二つ目の発話
質問1. 質問内容1 回答: 回答内容1
...
質問m. 質問内容m 回答: 回答内容m
# 発話計画のフォーマット例（※質問数は可変です）
システム(発話1):大谷翔平選手がロサンゼルス・ドジャースと10年7億ドルの契約を結んだって。
質問1. 契約期間は何年？ 回答: 10年だよ。
質問2. 契約金額はいくら？ 回答: 約7億ドルって言われてるよ。
質問3. どこの球団と契約したの？ 回答: ロサンゼルス・ドジャースだよ。
システム(発話2): その契約の中には後払い分もあるんだって。
質問1. 後払いってどういうこと？ 回答: 今もらわず、将来支払われるお金のことだよ。
質問2. なんで後払いにしたの？ 回答: 節税のためらしいよ。
";

pub const ACK_SYSTEM_PROMPT: &str = "あなたは会話の相槌を判定する役割です。";

/// The classifier answers はい/いいえ; any reply containing this token
/// counts as an acknowledgement.
pub const ACK_AFFIRMATIVE_TOKEN: &str = "はい";

pub fn ack_user_prompt(utterance: &str) -> String {
    format!(
        "以下のテキストが会話の相槌かどうかを判定してください。\n\nユーザの入力: {}\n\nこの入力は会話の相槌ですか？（はい/いいえ）",
        utterance
    )
}

pub const FALLBACK_SYSTEM_PROMPT: &str =
    "あなたはユーザーのニュースに関する質問に対し、正確で簡潔な回答を生成するシステムです。";

pub fn fallback_user_prompt(context: &str, question: &str) -> String {
    format!(
        "ニュース内容: {}\n質問: {}\n\nこの質問に対する正確で簡潔な回答を日本語で1文以内で答えてください。",
        context, question
    )
}
