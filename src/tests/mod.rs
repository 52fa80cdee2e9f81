mod language_algebra;
