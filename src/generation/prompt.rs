//! Prompt templates for grounded and casual generation

use crate::retrieval::SearchResult;

/// Prompt builder for knowledge-base queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Format a source location for the context block
    pub fn format_location(start_line: u32, end_line: u32, page_number: Option<u32>) -> String {
        match page_number {
            Some(page) => format!("Page {}, Lines {}-{}", page, start_line, end_line),
            None => format!("Lines {}-{}", start_line, end_line),
        }
    }

    /// One context block for a surviving search result.
    ///
    /// `index` is the result's position in the ranked list before relevance
    /// filtering, so source numbers line up with the ranking even when
    /// earlier entries were dropped.
    pub fn source_block(index: usize, result: &SearchResult) -> String {
        let location =
            Self::format_location(result.start_line, result.end_line, result.page_number);
        format!(
            "[Source {}: {} ({})]\n{}\n",
            index + 1,
            result.document_name,
            location,
            result.content
        )
    }

    /// Grounded question-answering prompt
    pub fn build_rag_prompt(query: &str, context: &str) -> String {
        format!(
            r#"You are a helpful AI assistant for a knowledge base system. Answer the user's question based ONLY on the provided context.

IMPORTANT RULES:
1. Only use information from the provided sources
2. If the sources don't contain enough information, say so clearly
3. Cite your sources by mentioning the document name
4. Be concise but comprehensive
5. If you're uncertain, express that uncertainty
6. Format your answer in a clear, readable way using markdown

CONTEXT FROM KNOWLEDGE BASE:
{context}

USER QUESTION: {query}

Please provide a well-structured answer with proper citations:"#,
            context = context,
            query = query
        )
    }

    /// Short conversational prompt for casual messages
    pub fn build_casual_prompt(query: &str) -> String {
        format!(
            r#"You are a friendly AI assistant for a knowledge base system.
The user sent a casual message. Respond naturally and briefly.
If they seem to want help, let them know they can ask questions about the uploaded documents.

User: {query}

Respond briefly and friendly:"#,
            query = query
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::DocType;

    fn result(page: Option<u32>) -> SearchResult {
        SearchResult {
            document_id: uuid::Uuid::new_v4(),
            document_name: "handbook.pdf".to_string(),
            doc_type: DocType::Pdf,
            chunk_index: 0,
            content: "Employees accrue leave monthly.".to_string(),
            distance: 0.2,
            relevance: 90.0,
            start_line: 3,
            end_line: 7,
            page_number: page,
        }
    }

    #[test]
    fn location_with_and_without_page() {
        assert_eq!(PromptBuilder::format_location(3, 7, None), "Lines 3-7");
        assert_eq!(
            PromptBuilder::format_location(3, 7, Some(2)),
            "Page 2, Lines 3-7"
        );
    }

    #[test]
    fn source_block_keeps_ranked_index() {
        let block = PromptBuilder::source_block(4, &result(Some(2)));
        assert!(block.starts_with("[Source 5: handbook.pdf (Page 2, Lines 3-7)]\n"));
        assert!(block.contains("Employees accrue leave monthly."));
    }

    #[test]
    fn rag_prompt_embeds_context_and_query() {
        let prompt = PromptBuilder::build_rag_prompt("How much leave?", "CONTEXT-HERE");
        assert!(prompt.contains("CONTEXT FROM KNOWLEDGE BASE:\nCONTEXT-HERE"));
        assert!(prompt.contains("USER QUESTION: How much leave?"));
    }

    #[test]
    fn casual_prompt_embeds_query() {
        let prompt = PromptBuilder::build_casual_prompt("hello");
        assert!(prompt.contains("User: hello"));
    }
}
