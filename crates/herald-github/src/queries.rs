//! GraphQL documents

/// Create a discussion in a category
pub const CREATE_DISCUSSION: &str = r#"
  mutation($repositoryId: ID!, $body: String!, $title: String!, $categoryId: ID!) {
    createDiscussion(input: {repositoryId: $repositoryId, body: $body, title: $title, categoryId: $categoryId}) {
      discussion {
        id
        url
      }
    }
  }
"#;

/// Attach labels to a discussion
pub const ADD_LABELS: &str = r#"
  mutation($discussionId: ID!, $labelIds: [ID!]!) {
    addLabelsToLabelable(input: {labelableId: $discussionId, labelIds: $labelIds}) {
      labelable {
        ... on Discussion {
          number
        }
      }
    }
  }
"#;

/// First 100 discussion categories of a repository
pub const DISCUSSION_CATEGORIES: &str = r#"
  query($owner: String!, $name: String!) {
    repository(owner: $owner, name: $name) {
      discussionCategories(first: 100) {
        nodes {
          id
          name
        }
      }
    }
  }
"#;

/// Discussion search
pub const SEARCH_DISCUSSIONS: &str = r#"
  query($q: String!) {
    search(type: DISCUSSION, query: $q, first: 100) {
      nodes {
        ... on Discussion {
          id
          url
        }
      }
    }
  }
"#;
