//! Built-in content for the `chunk` and `demo` commands.

pub const SAMPLE_DOCUMENT_PATH: &str = "sample_document.txt";

pub const SAMPLE_DOCUMENT: &str = "\
Python is a high-level programming language known for its simplicity and readability.
It was created by Guido van Rossum and released in 1991.

Python is widely used in various fields:
1. Web Development - Django, Flask frameworks
2. Data Science - Pandas, NumPy, Scikit-learn
3. Machine Learning - TensorFlow, PyTorch
4. Automation - Scripts and tools
5. Scientific Computing - Research and analysis

The language emphasizes code readability and allows developers to express concepts
in fewer lines of code than would be possible in languages such as C++ or Java.

Python's philosophy is embedded in the document called \"The Zen of Python\".
Some key principles include:
- Beautiful is better than ugly
- Explicit is better than implicit
- Simple is better than complex
- Readability counts

Python has a comprehensive standard library, often described as \"batteries included\".
This means developers can find modules for most tasks without external dependencies.
";

/// `(source, content)` pairs indexed by `sift demo`.
pub const KNOWLEDGE_BASE: [(&str, &str); 4] = [
    (
        "python_intro.txt",
        "Python is a high-level programming language created by Guido van Rossum in 1991. \
         It emphasizes code readability and has a comprehensive standard library.",
    ),
    (
        "ml_basics.txt",
        "Machine learning is a subset of artificial intelligence that enables systems to learn \
         and improve from experience without being explicitly programmed.",
    ),
    (
        "deep_learning.txt",
        "Deep learning uses artificial neural networks with multiple layers to process data \
         and is particularly effective for image recognition and natural language processing.",
    ),
    (
        "langchain_overview.txt",
        "LangChain is a framework for developing applications powered by language models. \
         It enables data connection, agent logic, and integration with various tools.",
    ),
];

pub const DEMO_QUESTIONS: [&str; 3] = [
    "What is Python?",
    "Explain machine learning",
    "What is LangChain?",
];

pub const DEMO_WEB_QUERY: &str = "What is Nvidia current AI news";
