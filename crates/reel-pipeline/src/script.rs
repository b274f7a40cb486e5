//! Script prompt building and reply parsing.
//!
//! The model is asked for a specific subtopic in `<t>` tags followed by one
//! sentence per `<s>` block.

/// Parsed model reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedScript {
    pub title: Option<String>,
    pub sentences: Vec<String>,
}

/// Build the script prompt for `topic`, steering away from `used_topics`.
pub fn build_prompt(topic: &str, used_topics: &[String], sentence_count: usize) -> String {
    let mut prompt = format!(
        "Pick one specific, interesting subtopic of '{topic}' and explain it in {n} connected sentences.\n\
         Begin with the subtopic wrapped in <t></t> tags.\n\
         Then write the {n} sentences, each wrapped in <s></s> tags. They should flow as one short \
         explanation that is easy to picture, written for a general audience without jargon, using \
         vivid imagery or everyday comparisons where they help.\n\
         Return only the title and the sentence blocks, with no other commentary.\n\n\
         Example for the topic 'Black Holes':\n\
         <t>What happens if you fall into a black hole?</t>\n\
         <s>Falling into a black hole, you would be stretched thin by its enormous gravity.</s>\n\
         <s>Scientists really do call this 'spaghettification'.</s>\n\
         <s>As you sink deeper, time runs slower for you than for anyone watching from far away.</s>\n\
         <s>Finally you cross the event horizon, the point of no return, and vanish from view.</s>\n\n\
         Now write the same kind of explanation for the topic: '{topic}'.",
        topic = topic,
        n = sentence_count,
    );

    if !used_topics.is_empty() {
        let avoid = used_topics
            .iter()
            .map(|t| format!("'{}'", t))
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            "\nDo not pick any of these subtopics: {}.",
            avoid
        ));
    }

    prompt
}

/// Extract the title and sentences from a tagged reply.
///
/// A sentence is the trimmed text before `</s>` in every `<s>` chunk that has
/// a closing tag; unclosed chunks are ignored. Empty sentences keep their
/// position.
pub fn parse_script(reply: &str) -> ParsedScript {
    let sentences = reply
        .split("<s>")
        .filter(|chunk| chunk.contains("</s>"))
        .filter_map(|chunk| chunk.split("</s>").next())
        .map(|s| s.trim().to_string())
        .collect();

    let title = reply
        .split("<t>")
        .filter(|chunk| chunk.contains("</t>"))
        .filter_map(|chunk| chunk.split("</t>").next())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty());

    ParsedScript { title, sentences }
}

/// Force exactly `count` sentences: extras are dropped, missing ones become
/// `"(<topic> continued...)"`.
pub fn fit_sentences(mut sentences: Vec<String>, count: usize, topic: &str) -> Vec<String> {
    sentences.truncate(count);
    while sentences.len() < count {
        sentences.push(format!("({} continued...)", topic));
    }
    sentences
}
